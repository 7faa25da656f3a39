//! Payment provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod razorpay;

pub use razorpay::{RazorpayProvider, RazorpayProviderBuilder, sign_payment};
