//! TLD 报价类型定义

use serde::{Deserialize, Serialize};

use super::{Amount, Currency};

/// A TLD offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainOffer {
    /// TLD with a leading dot (`.dev`).
    pub tld: String,
    pub base_price: Amount,
    pub renewal_price: Amount,
    pub currency: Currency,
    pub is_available: bool,
}

/// Availability of one label under one offered TLD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAvailability {
    pub tld: String,
    /// `label + tld`, lowercase.
    pub full_domain: String,
    pub price: Amount,
    pub renewal_price: Amount,
    pub currency: Currency,
    /// `false` when a user already holds the name.
    pub available: bool,
}
