//! 用户域名与映射类型定义

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, Currency};

/// SSL provisioning status of a domain mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslStatus {
    Pending,
    Active,
    Failed,
}

impl SslStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SslStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "failed" => Ok(Self::Failed),
            other => Err(format!("Unknown SSL status: {other}")),
        }
    }
}

/// A domain claimed by a user. Never hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDomain {
    pub id: String,
    pub user_id: String,
    /// Globally unique, lowercase.
    pub domain_name: String,
    pub tld: String,
    pub portfolio_id: String,
    #[serde(with = "crate::utils::datetime")]
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
    pub is_verified: bool,
    /// Provider payment id, or `free_<uuid>` for zero-amount claims.
    pub payment_id: String,
    pub amount_paid: Amount,
    pub currency: Currency,
    /// `None` when no coupon applied or the store cannot track coupons.
    pub coupon_code: Option<String>,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a user domain and its mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserDomain {
    pub id: String,
    pub mapping_id: String,
    pub user_id: String,
    pub domain_name: String,
    pub tld: String,
    pub portfolio_id: String,
    pub expiry_date: DateTime<Utc>,
    pub payment_id: String,
    pub amount_paid: Amount,
    pub currency: Currency,
    pub coupon_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Routing/SSL record linking a claimed domain to a portfolio. 1:1 with [`UserDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainMapping {
    pub id: String,
    pub user_domain_id: String,
    pub portfolio_id: String,
    pub is_active: bool,
    pub dns_configured: bool,
    pub ssl_status: SslStatus,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A user domain with its mapping, as listed to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDomainWithMapping {
    #[serde(flatten)]
    pub domain: UserDomain,
    pub mapping: Option<DomainMapping>,
}

/// Optional storage features detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCapabilities {
    /// `user_domains.coupon_code` exists.
    pub coupon_tracking: bool,
}

impl Default for StorageCapabilities {
    fn default() -> Self {
        Self {
            coupon_tracking: true,
        }
    }
}
