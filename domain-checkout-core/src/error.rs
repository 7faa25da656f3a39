//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::Amount;

// Re-export library error type
pub use domain_checkout_provider::ProviderError;

/// Message shown to callers for any authenticity failure. Detail stays in the logs.
pub const PAYMENT_VERIFICATION_FAILED: &str = "Payment verification failed";

/// Coarse classification of [`CoreError`], drives how callers surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// User-correctable input problem, surfaced verbatim.
    Validation,
    /// Domain already claimed, surfaced verbatim.
    Conflict,
    /// Resource missing or not owned by the caller.
    NotFound,
    /// Security-relevant rejection, surfaced as a generic message.
    Authenticity,
    /// Payment or DNS service unreachable, safe to retry the whole step.
    ProviderUnavailable,
    /// Storage schema is missing an optional column.
    SchemaIncompatible,
    /// Anything else.
    Internal,
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain label is not valid for the requested TLD
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    /// TLD not offered or not currently available
    #[error("Unknown or unavailable TLD: {0}")]
    UnknownTld(String),

    /// Coupon code not in the coupon table
    #[error("Invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// Caller-supplied amount differs from the server-side price
    #[error("Amount mismatch: expected {expected}, got {supplied}")]
    AmountMismatch { expected: Amount, supplied: Amount },

    /// Portfolio missing, owned by someone else, or unpublished
    #[error("Portfolio not eligible: {0}")]
    PortfolioNotEligible(String),

    /// Provider order exists but is not paid
    #[error("Payment not completed for order {order_id} (status: {status})")]
    PaymentNotCompleted { order_id: String, status: String },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Domain already registered by another user
    #[error("Domain already taken: {0}")]
    DomainTaken(String),

    /// User domain not found (or not owned by the caller)
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Checkout callback signature mismatch
    #[error("Invalid payment signature for order {0}")]
    InvalidSignature(String),

    /// Order was issued for a different user
    #[error("Order {order_id} does not belong to the caller")]
    UserMismatch { order_id: String },

    /// Order notes missing, unknown or inconsistent
    #[error("Malformed order metadata: {0}")]
    MalformedOrderMetadata(String),

    /// Payment or DNS service unreachable / timed out
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Storage rejected an optional field
    #[error("Storage schema incompatible: {0}")]
    SchemaIncompatible(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        if err.is_retryable() {
            Self::ProviderUnavailable(err.to_string())
        } else {
            Self::Provider(err)
        }
    }
}

impl CoreError {
    /// Classify this error.
    ///
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDomainName(_)
            | Self::UnknownTld(_)
            | Self::InvalidCoupon(_)
            | Self::AmountMismatch { .. }
            | Self::PortfolioNotEligible(_)
            | Self::PaymentNotCompleted { .. }
            | Self::ValidationError(_) => ErrorKind::Validation,
            Self::DomainTaken(_) => ErrorKind::Conflict,
            Self::DomainNotFound(_) => ErrorKind::NotFound,
            Self::InvalidSignature(_)
            | Self::UserMismatch { .. }
            | Self::MalformedOrderMetadata(_) => ErrorKind::Authenticity,
            Self::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            Self::SchemaIncompatible(_) => ErrorKind::SchemaIncompatible,
            Self::StorageError(_) | Self::SerializationError(_) | Self::Provider(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self.kind() {
            ErrorKind::Validation
            | ErrorKind::Conflict
            | ErrorKind::NotFound
            | ErrorKind::ProviderUnavailable => true,
            ErrorKind::Internal => matches!(self, Self::Provider(e) if e.is_expected()),
            ErrorKind::Authenticity | ErrorKind::SchemaIncompatible => false,
        }
    }

    /// Safe to retry the whole step (nothing durable happened).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ProviderUnavailable
    }

    /// Message suitable for the end user.
    ///
    /// Validation, conflict and not-found errors are returned verbatim. Authenticity
    /// failures collapse into one generic message, internal errors into another.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Conflict | ErrorKind::NotFound => self.to_string(),
            ErrorKind::Authenticity => PAYMENT_VERIFICATION_FAILED.to_string(),
            ErrorKind::ProviderUnavailable => {
                "A payment or DNS service is temporarily unavailable, please retry".to_string()
            }
            ErrorKind::SchemaIncompatible | ErrorKind::Internal => {
                "Internal error, please retry later".to_string()
            }
        }
    }

    /// Log this error at the level its classification calls for.
    pub fn log(&self, operation: &str) {
        if self.is_expected() {
            log::warn!("{operation} failed: {self}");
        } else {
            log::error!("{operation} failed: {self}");
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
