//! TOML configuration
//!
//! Values are read from a TOML file with defaults for everything but the payment
//! credentials. Secrets can be supplied through the environment instead:
//!
//! | variable | overrides |
//! |---|---|
//! | `RAZORPAY_KEY_ID` | `payment.key_id` |
//! | `RAZORPAY_KEY_SECRET` | `payment.key_secret` |
//! | `DOMAIN_CHECKOUT_DB_PATH` | `database.path` |

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use domain_checkout_core::error::{CoreError, CoreResult};
use domain_checkout_core::services::WorkflowSettings;
use domain_checkout_core::traits::{DnsResolver, SystemDnsResolver};
use domain_checkout_core::types::{AcceptedTargets, CouponTable};
use domain_checkout_provider::{
    PaymentProvider, ProviderCredentials, RazorpayProvider, RetryPolicy,
};
use serde::{Deserialize, Serialize};

pub const ENV_KEY_ID: &str = "RAZORPAY_KEY_ID";
pub const ENV_KEY_SECRET: &str = "RAZORPAY_KEY_SECRET";
pub const ENV_DB_PATH: &str = "DOMAIN_CHECKOUT_DB_PATH";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub payment: PaymentConfig,
    pub dns: DnsConfig,
    /// `CODE = percent_off`. Absent means the built-in launch coupons.
    pub coupons: Option<BTreeMap<String, u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` database file, created if missing.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("domain-checkout.db"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    /// Override for the provider API base URL.
    pub api_base: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Retries for order fetches (order creation is never retried).
    pub fetch_retries: u32,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            api_base: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            fetch_retries: 2,
        }
    }
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"***")
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("fetch_retries", &self.fetch_retries)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Nameserver IP used for verification lookups, system resolver when unset.
    pub nameserver: Option<String>,
    pub timeout_ms: u64,
    /// Platform addresses accepted for apex A/AAAA records.
    pub accepted_addresses: Vec<String>,
    /// Platform hostnames accepted as CNAME targets.
    pub accepted_cnames: Vec<String>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        let targets = AcceptedTargets::default();
        Self {
            nameserver: None,
            timeout_ms: 5000,
            accepted_addresses: targets.addresses,
            accepted_cnames: targets.cnames,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        toml::from_str(content)
            .map_err(|e| CoreError::ValidationError(format!("Invalid configuration: {e}")))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::StorageError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key_id) = get(ENV_KEY_ID) {
            self.payment.key_id = key_id;
        }
        if let Some(key_secret) = get(ENV_KEY_SECRET) {
            self.payment.key_secret = key_secret;
        }
        if let Some(path) = get(ENV_DB_PATH) {
            self.database.path = PathBuf::from(path);
        }
    }

    /// Check everything that can be checked without I/O.
    pub fn validate(&self) -> CoreResult<()> {
        self.credentials()
            .validate()
            .map_err(|e| CoreError::ValidationError(e.to_string()))?;

        if self.payment.request_timeout_secs == 0 || self.payment.connect_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "payment timeouts must be greater than zero".to_string(),
            ));
        }
        if self.dns.timeout_ms == 0 {
            return Err(CoreError::ValidationError(
                "dns.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.accepted_targets().is_empty() {
            return Err(CoreError::ValidationError(
                "at least one accepted DNS target is required".to_string(),
            ));
        }
        self.coupon_table()?;

        Ok(())
    }

    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials::Razorpay {
            key_id: self.payment.key_id.clone(),
            key_secret: self.payment.key_secret.clone(),
        }
    }

    pub fn coupon_table(&self) -> CoreResult<CouponTable> {
        match &self.coupons {
            None => Ok(CouponTable::default()),
            Some(entries) => CouponTable::new(entries.iter().map(|(code, &pct)| (code, pct)))
                .map_err(CoreError::ValidationError),
        }
    }

    pub fn accepted_targets(&self) -> AcceptedTargets {
        AcceptedTargets {
            addresses: self.dns.accepted_addresses.clone(),
            cnames: self.dns.accepted_cnames.clone(),
        }
    }

    pub fn workflow_settings(&self) -> CoreResult<WorkflowSettings> {
        Ok(WorkflowSettings {
            coupons: Arc::new(self.coupon_table()?),
            accepted_targets: self.accepted_targets(),
        })
    }

    /// Razorpay client built from the payment section.
    pub fn payment_provider(&self) -> CoreResult<Arc<dyn PaymentProvider>> {
        self.credentials()
            .validate()
            .map_err(|e| CoreError::ValidationError(e.to_string()))?;

        let payment = &self.payment;
        let mut builder =
            RazorpayProvider::builder(payment.key_id.clone(), payment.key_secret.clone())
                .request_timeout(Duration::from_secs(payment.request_timeout_secs))
                .connect_timeout(Duration::from_secs(payment.connect_timeout_secs))
                .fetch_retry(RetryPolicy {
                    max_retries: payment.fetch_retries,
                    ..RetryPolicy::default()
                });
        if let Some(base) = &payment.api_base {
            builder = builder.api_base(base.clone());
        }

        Ok(Arc::new(builder.build()))
    }

    pub fn dns_resolver(&self) -> Arc<dyn DnsResolver> {
        Arc::new(SystemDnsResolver::new(
            self.dns.nameserver.clone(),
            Duration::from_millis(self.dns.timeout_ms),
        ))
    }
}
