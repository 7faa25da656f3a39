//! Application bootstrap for domain checkout.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter injection)
//! and `AppConfig` (TOML configuration with environment overrides).

pub mod adapters;
pub mod config;

use std::sync::Arc;
use std::time::Duration;

use domain_checkout_core::error::{CoreError, CoreResult};
use domain_checkout_core::services::{
    CatalogService, CheckoutService, DnsVerificationService, OrderService,
    PaymentVerificationService, PricingService, RegistrarService, ServiceContext,
    UserDomainService, WorkflowSettings,
};
use domain_checkout_core::traits::{
    DnsResolver, DomainOfferRepository, PortfolioRepository, SystemDnsResolver,
    UserDomainRepository,
};
use domain_checkout_core::types::StorageCapabilities;
use domain_checkout_provider::PaymentProvider;

pub use config::AppConfig;

/// Lookup timeout used when no resolver is injected.
const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// What the startup checks found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub capabilities: StorageCapabilities,
    pub available_offers: usize,
    pub coupons: usize,
}

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters and settings)
    pub ctx: Arc<ServiceContext>,
    /// Coupon pricing and previews
    pub pricing: PricingService,
    /// Order issuing
    pub orders: OrderService,
    /// Checkout callback verification
    pub payments: PaymentVerificationService,
    /// Domain registration
    pub registrar: RegistrarService,
    /// DNS verification
    pub dns_verification: DnsVerificationService,
    /// TLD offers and availability search
    pub catalog: CatalogService,
    /// Owner-facing domain management and host resolution
    pub user_domains: UserDomainService,
    /// Order → payment → registration, end to end
    pub checkout: CheckoutService,
}

impl AppState {
    /// Log what the storage supports and sanity-check the catalog.
    ///
    /// Never fails on an empty catalog, it only warns.
    pub async fn run_startup(&self) -> CoreResult<StartupReport> {
        let capabilities = self.ctx.user_domain_repository.capabilities();
        if capabilities.coupon_tracking {
            log::info!("Storage capabilities: coupon tracking enabled");
        } else {
            log::warn!("Storage capabilities: coupon tracking unavailable, codes will be dropped");
        }

        let offers = self.ctx.offer_repository.list_available().await?;
        if offers.is_empty() {
            log::warn!("No TLD offers are available, every purchase will fail");
        } else {
            log::info!("{} TLD offers available", offers.len());
        }

        let coupons = self.ctx.settings.coupons.len();
        log::info!("Coupon table loaded with {coupons} codes");

        Ok(StartupReport {
            capabilities,
            available_offers: offers.len(),
            coupons,
        })
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `offer_repository`: TLD offers
/// - `user_domain_repository`: claimed domains and mappings
/// - `portfolio_repository`: portfolio ownership and publish state
/// - `payment_provider`: order issuing and signature checks
///
/// # Optional
/// - `dns_resolver`: defaults to `SystemDnsResolver`
/// - `settings`: defaults to the launch coupons and platform DNS targets
pub struct AppStateBuilder {
    offer_repository: Option<Arc<dyn DomainOfferRepository>>,
    user_domain_repository: Option<Arc<dyn UserDomainRepository>>,
    portfolio_repository: Option<Arc<dyn PortfolioRepository>>,
    payment_provider: Option<Arc<dyn PaymentProvider>>,
    dns_resolver: Option<Arc<dyn DnsResolver>>,
    settings: Option<WorkflowSettings>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            offer_repository: None,
            user_domain_repository: None,
            portfolio_repository: None,
            payment_provider: None,
            dns_resolver: None,
            settings: None,
        }
    }

    /// Builder preloaded with the payment provider, resolver and settings from `config`.
    ///
    /// Storage still has to be supplied.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::new()
            .payment_provider(config.payment_provider()?)
            .dns_resolver(config.dns_resolver())
            .settings(config.workflow_settings()?))
    }

    #[must_use]
    pub fn offer_repository(mut self, repo: Arc<dyn DomainOfferRepository>) -> Self {
        self.offer_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn user_domain_repository(mut self, repo: Arc<dyn UserDomainRepository>) -> Self {
        self.user_domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn portfolio_repository(mut self, repo: Arc<dyn PortfolioRepository>) -> Self {
        self.portfolio_repository = Some(repo);
        self
    }

    /// Use one `SqliteStore` for all three repositories.
    #[cfg(feature = "sqlite-store")]
    #[must_use]
    pub fn sqlite_store(self, store: &Arc<adapters::SqliteStore>) -> Self {
        self.offer_repository(Arc::clone(store) as Arc<dyn DomainOfferRepository>)
            .user_domain_repository(Arc::clone(store) as Arc<dyn UserDomainRepository>)
            .portfolio_repository(Arc::clone(store) as Arc<dyn PortfolioRepository>)
    }

    #[must_use]
    pub fn payment_provider(mut self, provider: Arc<dyn PaymentProvider>) -> Self {
        self.payment_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn dns_resolver(mut self, resolver: Arc<dyn DnsResolver>) -> Self {
        self.dns_resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let offer_repository = self.offer_repository.ok_or_else(|| {
            CoreError::ValidationError("offer_repository is required".to_string())
        })?;
        let user_domain_repository = self.user_domain_repository.ok_or_else(|| {
            CoreError::ValidationError("user_domain_repository is required".to_string())
        })?;
        let portfolio_repository = self.portfolio_repository.ok_or_else(|| {
            CoreError::ValidationError("portfolio_repository is required".to_string())
        })?;
        let payment_provider = self.payment_provider.ok_or_else(|| {
            CoreError::ValidationError("payment_provider is required".to_string())
        })?;
        let dns_resolver = self
            .dns_resolver
            .unwrap_or_else(|| Arc::new(SystemDnsResolver::new(None, DEFAULT_DNS_TIMEOUT)));
        let settings = self.settings.unwrap_or_default();

        let pricing = PricingService::new(Arc::clone(&settings.coupons));
        let ctx = Arc::new(ServiceContext::new(
            offer_repository,
            user_domain_repository,
            portfolio_repository,
            payment_provider,
            dns_resolver,
            settings,
        ));

        Ok(AppState {
            pricing,
            orders: OrderService::new(Arc::clone(&ctx)),
            payments: PaymentVerificationService::new(Arc::clone(&ctx)),
            registrar: RegistrarService::new(Arc::clone(&ctx)),
            dns_verification: DnsVerificationService::new(Arc::clone(&ctx)),
            catalog: CatalogService::new(Arc::clone(&ctx)),
            user_domains: UserDomainService::new(Arc::clone(&ctx)),
            checkout: CheckoutService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
