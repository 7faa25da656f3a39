use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Free-form key/value metadata attached to an order.
///
/// Razorpay calls these "notes" (at most 15 pairs, 256 chars per value).
pub type OrderNotes = BTreeMap<String, String>;

/// Maximum number of note entries a single order can carry.
pub const MAX_ORDER_NOTES: usize = 15;

/// Supported payment provider types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Razorpay (India).
    Razorpay,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Razorpay => write!(f, "razorpay"),
        }
    }
}

/// Settlement currency of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    /// ISO 4217 code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Inr => "INR",
        }
    }

    /// Number of decimal places of the minor unit (cents, paise).
    #[must_use]
    pub fn minor_unit_exponent(self) -> u32 {
        match self {
            Self::Usd | Self::Inr => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "INR" => Ok(Self::Inr),
            other => Err(format!("Unsupported currency: {other}")),
        }
    }
}

/// Lifecycle status of a provider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order created, no payment attempt yet.
    Created,
    /// At least one payment attempt was made, none captured.
    Attempted,
    /// A payment was captured for the full amount.
    Paid,
    /// Status string this crate does not know. Never treated as paid.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Attempted => "attempted",
            Self::Paid => "paid",
            Self::Unknown => "unknown",
        }
    }
}

/// Request to create an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in minor units (paise, cents).
    pub amount_minor: u64,
    /// Currency of `amount_minor`.
    pub currency: Currency,
    /// Merchant-side receipt identifier (max 40 chars).
    pub receipt: String,
    /// Metadata echoed back by [`PaymentProvider::fetch_order`](crate::PaymentProvider::fetch_order).
    pub notes: OrderNotes,
}

/// An order as seen by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOrder {
    /// Provider order id (`order_...`).
    pub id: String,
    /// Order amount in minor units.
    pub amount_minor: u64,
    /// Amount captured so far, in minor units.
    pub amount_paid_minor: u64,
    /// Currency of the order.
    pub currency: Currency,
    /// Current status.
    pub status: OrderStatus,
    /// Merchant receipt, if one was set.
    pub receipt: Option<String>,
    /// Notes stored with the order.
    pub notes: OrderNotes,
    /// Creation time reported by the provider.
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload the checkout widget hands back after a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    /// Provider order id.
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    /// Provider payment id.
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    /// Hex HMAC signature over `order_id|payment_id`.
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

/// Credential validation error, raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CredentialValidationError {
    /// A credential field is empty or whitespace-only.
    #[error("Field must not be empty: {label}")]
    EmptyField {
        provider: ProviderType,
        field: String,
        label: String,
    },
    /// A credential field has an invalid format.
    #[error("{label}: {reason}")]
    InvalidFormat {
        provider: ProviderType,
        field: String,
        label: String,
        reason: String,
    },
}

/// Type-safe credential container for all supported payment providers.
///
/// ```json
/// { "provider": "razorpay", "credentials": { "key_id": "rzp_test_...", "key_secret": "..." } }
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    #[serde(rename = "razorpay")]
    Razorpay {
        /// Public key id, also handed to the checkout widget.
        key_id: String,
        /// Secret used for API auth and payment signatures.
        key_secret: String,
    },
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Razorpay { key_id, .. } => f
                .debug_struct("Razorpay")
                .field("key_id", key_id)
                .field("key_secret", &"***")
                .finish(),
        }
    }
}

impl ProviderCredentials {
    #[must_use]
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Razorpay { .. } => ProviderType::Razorpay,
        }
    }

    /// Check required fields and key formats.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        match self {
            Self::Razorpay { key_id, key_secret } => {
                let provider = ProviderType::Razorpay;
                if key_id.trim().is_empty() {
                    return Err(CredentialValidationError::EmptyField {
                        provider,
                        field: "key_id".to_string(),
                        label: "Key ID".to_string(),
                    });
                }
                if key_secret.trim().is_empty() {
                    return Err(CredentialValidationError::EmptyField {
                        provider,
                        field: "key_secret".to_string(),
                        label: "Key Secret".to_string(),
                    });
                }
                if !(key_id.starts_with("rzp_test_") || key_id.starts_with("rzp_live_")) {
                    return Err(CredentialValidationError::InvalidFormat {
                        provider,
                        field: "key_id".to_string(),
                        label: "Key ID".to_string(),
                        reason: "expected an rzp_test_ or rzp_live_ key".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}
