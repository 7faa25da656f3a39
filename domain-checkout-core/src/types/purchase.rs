//! 购买流程类型定义
//!
//! [`PurchaseIntent`] is what a pending payment is for. It travels inside the provider
//! order as [`OrderMetadata`] and is decoded back, fail-closed, when the checkout
//! callback arrives.

use std::collections::BTreeSet;

use domain_checkout_provider::OrderNotes;
use serde::{Deserialize, Serialize};

use super::{Amount, Currency, UserDomain};
use crate::error::{CoreError, CoreResult};

/// Caller input for issuing an order (and for starting a checkout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub user_id: String,
    /// Full domain name, e.g. `mysite.dev`.
    pub domain_name: String,
    /// TLD with or without the leading dot.
    pub tld: String,
    pub portfolio_id: String,
    /// Amount the client displayed and expects to pay.
    pub amount: Amount,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// The reconstructable record of what a pending payment is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseIntent {
    pub user_id: String,
    /// Lowercase full domain name.
    pub domain_name: String,
    /// Lowercase TLD with leading dot.
    pub tld: String,
    pub portfolio_id: String,
    pub base_price: Amount,
    /// Canonical coupon code, `None` when no coupon applied.
    pub coupon_code: Option<String>,
    pub payable: Amount,
    pub currency: Currency,
}

/// Provider-facing handle returned to the client to open the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHandle {
    pub provider_order_id: String,
    pub amount: Amount,
    pub currency: Currency,
    /// Public provider key id for the checkout widget.
    pub key_id: String,
    pub receipt: String,
}

/// Result of issuing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedOrder {
    /// A provider order was created and must be paid.
    Payment(OrderHandle),
    /// Payable amount is zero, no provider order exists.
    Free(PurchaseIntent),
}

/// Authenticated purchase, ready for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPurchase {
    pub user_id: String,
    pub domain_name: String,
    pub tld: String,
    pub portfolio_id: String,
    pub amount_paid: Amount,
    pub currency: Currency,
    pub coupon_code: Option<String>,
}

impl From<PurchaseIntent> for VerifiedPurchase {
    fn from(intent: PurchaseIntent) -> Self {
        Self {
            user_id: intent.user_id,
            domain_name: intent.domain_name,
            tld: intent.tld,
            portfolio_id: intent.portfolio_id,
            amount_paid: intent.payable,
            currency: intent.currency,
            coupon_code: intent.coupon_code,
        }
    }
}

/// Result of starting a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum CheckoutOutcome {
    /// Client must complete payment with this order.
    PaymentRequired(OrderHandle),
    /// Free purchase, the domain is already registered.
    Claimed(UserDomain),
}

/// Versioned purchase-intent metadata stored in the provider order notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMetadata {
    pub intent: PurchaseIntent,
}

impl OrderMetadata {
    pub const SCHEMA_VERSION: &'static str = "1";
    pub const PURPOSE: &'static str = "domain_purchase";

    const KEY_SCHEMA_VERSION: &'static str = "schema_version";
    const KEY_PURPOSE: &'static str = "purpose";
    const KEY_USER_ID: &'static str = "user_id";
    const KEY_DOMAIN_NAME: &'static str = "domain_name";
    const KEY_TLD: &'static str = "tld";
    const KEY_PORTFOLIO_ID: &'static str = "portfolio_id";
    const KEY_BASE_PRICE: &'static str = "base_price";
    const KEY_COUPON_CODE: &'static str = "coupon_code";
    const KEY_PAYABLE: &'static str = "payable_amount";
    const KEY_CURRENCY: &'static str = "currency";

    const REQUIRED_KEYS: [&'static str; 9] = [
        Self::KEY_SCHEMA_VERSION,
        Self::KEY_PURPOSE,
        Self::KEY_USER_ID,
        Self::KEY_DOMAIN_NAME,
        Self::KEY_TLD,
        Self::KEY_PORTFOLIO_ID,
        Self::KEY_BASE_PRICE,
        Self::KEY_PAYABLE,
        Self::KEY_CURRENCY,
    ];

    #[must_use]
    pub fn new(intent: PurchaseIntent) -> Self {
        Self { intent }
    }

    /// Encode as provider notes. The coupon key is omitted when no coupon applies.
    #[must_use]
    pub fn to_notes(&self) -> OrderNotes {
        let i = &self.intent;
        let mut notes = OrderNotes::new();
        notes.insert(Self::KEY_SCHEMA_VERSION.into(), Self::SCHEMA_VERSION.into());
        notes.insert(Self::KEY_PURPOSE.into(), Self::PURPOSE.into());
        notes.insert(Self::KEY_USER_ID.into(), i.user_id.clone());
        notes.insert(Self::KEY_DOMAIN_NAME.into(), i.domain_name.clone());
        notes.insert(Self::KEY_TLD.into(), i.tld.clone());
        notes.insert(Self::KEY_PORTFOLIO_ID.into(), i.portfolio_id.clone());
        notes.insert(Self::KEY_BASE_PRICE.into(), i.base_price.to_string());
        notes.insert(Self::KEY_PAYABLE.into(), i.payable.to_string());
        notes.insert(Self::KEY_CURRENCY.into(), i.currency.code().into());
        if let Some(code) = &i.coupon_code {
            notes.insert(Self::KEY_COUPON_CODE.into(), code.clone());
        }
        notes
    }

    /// Decode provider notes, rejecting anything not produced by [`Self::to_notes`].
    pub fn from_notes(notes: &OrderNotes) -> CoreResult<Self> {
        let malformed = |msg: String| CoreError::MalformedOrderMetadata(msg);

        let allowed: BTreeSet<&str> = Self::REQUIRED_KEYS
            .iter()
            .copied()
            .chain([Self::KEY_COUPON_CODE])
            .collect();
        if let Some(unknown) = notes.keys().find(|k| !allowed.contains(k.as_str())) {
            return Err(malformed(format!("unknown key '{unknown}'")));
        }

        let field = |key: &str| -> CoreResult<&str> {
            notes
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| malformed(format!("missing '{key}'")))
        };

        let version = field(Self::KEY_SCHEMA_VERSION)?;
        if version != Self::SCHEMA_VERSION {
            return Err(malformed(format!("unsupported schema_version '{version}'")));
        }
        let purpose = field(Self::KEY_PURPOSE)?;
        if purpose != Self::PURPOSE {
            return Err(malformed(format!("unexpected purpose '{purpose}'")));
        }

        let amount = |key: &str| -> CoreResult<Amount> {
            field(key)?
                .parse()
                .map_err(|e: String| malformed(format!("'{key}': {e}")))
        };
        let base_price = amount(Self::KEY_BASE_PRICE)?;
        let payable = amount(Self::KEY_PAYABLE)?;
        if payable > base_price {
            return Err(malformed(format!(
                "payable {payable} exceeds base price {base_price}"
            )));
        }

        let currency: Currency = field(Self::KEY_CURRENCY)?
            .parse()
            .map_err(|e: String| malformed(e))?;

        let domain_name = field(Self::KEY_DOMAIN_NAME)?.to_string();
        let tld = field(Self::KEY_TLD)?.to_string();
        if !domain_name.ends_with(&tld) || domain_name.len() == tld.len() {
            return Err(malformed(format!(
                "domain '{domain_name}' does not match tld '{tld}'"
            )));
        }

        let coupon_code = match notes.get(Self::KEY_COUPON_CODE) {
            Some(code) if code.trim().is_empty() => {
                return Err(malformed("empty 'coupon_code'".to_string()));
            }
            Some(code) => Some(code.trim().to_string()),
            None => None,
        };

        Ok(Self {
            intent: PurchaseIntent {
                user_id: field(Self::KEY_USER_ID)?.to_string(),
                domain_name,
                tld,
                portfolio_id: field(Self::KEY_PORTFOLIO_ID)?.to_string(),
                base_price,
                coupon_code,
                payable,
                currency,
            },
        })
    }
}
