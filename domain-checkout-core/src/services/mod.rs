//! 业务逻辑服务层

mod catalog_service;
mod checkout_service;
mod dns_verification_service;
mod order_service;
mod payment_verification_service;
mod pricing_service;
mod registrar_service;
mod user_domain_service;

pub use catalog_service::CatalogService;
pub use checkout_service::CheckoutService;
pub use dns_verification_service::DnsVerificationService;
pub use order_service::OrderService;
pub use payment_verification_service::PaymentVerificationService;
pub use pricing_service::PricingService;
pub use registrar_service::RegistrarService;
pub use user_domain_service::UserDomainService;

use std::sync::Arc;

use domain_checkout_provider::PaymentProvider;

use crate::error::{CoreError, CoreResult};
use crate::traits::{DnsResolver, DomainOfferRepository, PortfolioRepository, UserDomainRepository};
use crate::types::{AcceptedTargets, CouponTable, Portfolio, UserDomain};

/// Immutable workflow configuration shared by every service.
#[derive(Debug, Clone, Default)]
pub struct WorkflowSettings {
    /// The one coupon table used by order issuing and price previews.
    pub coupons: Arc<CouponTable>,
    /// DNS targets that count as pointing at the platform.
    pub accepted_targets: AcceptedTargets,
}

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储与 Provider 实现。
pub struct ServiceContext {
    /// TLD 报价仓库
    pub offer_repository: Arc<dyn DomainOfferRepository>,
    /// 用户域名仓库
    pub user_domain_repository: Arc<dyn UserDomainRepository>,
    /// 作品集只读访问
    pub portfolio_repository: Arc<dyn PortfolioRepository>,
    /// 支付 Provider
    pub payment_provider: Arc<dyn PaymentProvider>,
    /// DNS 解析
    pub dns_resolver: Arc<dyn DnsResolver>,
    pub settings: WorkflowSettings,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        offer_repository: Arc<dyn DomainOfferRepository>,
        user_domain_repository: Arc<dyn UserDomainRepository>,
        portfolio_repository: Arc<dyn PortfolioRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        dns_resolver: Arc<dyn DnsResolver>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            offer_repository,
            user_domain_repository,
            portfolio_repository,
            payment_provider,
            dns_resolver,
            settings,
        }
    }

    /// Portfolio owned by `user_id` and published, else `PortfolioNotEligible`.
    pub async fn eligible_portfolio(
        &self,
        user_id: &str,
        portfolio_id: &str,
    ) -> CoreResult<Portfolio> {
        match self.portfolio_repository.find_by_id(portfolio_id).await? {
            Some(p) if p.is_eligible_for(user_id) => Ok(p),
            Some(p) if p.user_id == user_id => Err(CoreError::PortfolioNotEligible(format!(
                "portfolio {portfolio_id} must be published"
            ))),
            _ => Err(CoreError::PortfolioNotEligible(format!(
                "portfolio {portfolio_id} not found"
            ))),
        }
    }

    /// User domain owned by `user_id`, else `DomainNotFound`.
    ///
    /// Someone else's domain is reported exactly like a missing one.
    pub async fn owned_domain(&self, user_id: &str, user_domain_id: &str) -> CoreResult<UserDomain> {
        self.user_domain_repository
            .find_by_id(user_domain_id)
            .await?
            .filter(|d| d.user_id == user_id)
            .ok_or_else(|| CoreError::DomainNotFound(user_domain_id.to_string()))
    }
}
