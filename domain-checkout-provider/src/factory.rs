//! Provider factory functions.

use std::sync::Arc;

use crate::error::{ProviderError, Result};
use crate::providers::RazorpayProvider;
use crate::traits::PaymentProvider;
use crate::types::ProviderCredentials;

/// Creates a [`PaymentProvider`] instance from the given credentials.
///
/// Credentials are validated first, so a malformed key pair fails here instead of on
/// the first API call.
///
/// # Examples
///
/// ```rust,no_run
/// use domain_checkout_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Razorpay {
///     key_id: "rzp_test_xxx".to_string(),
///     key_secret: "your-secret".to_string(),
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn PaymentProvider>> {
    credentials
        .validate()
        .map_err(|e| ProviderError::InvalidCredentials {
            provider: credentials.provider_type().to_string(),
            raw_message: Some(e.to_string()),
        })?;

    match credentials {
        ProviderCredentials::Razorpay { key_id, key_secret } => {
            Ok(Arc::new(RazorpayProvider::new(key_id, key_secret)))
        }
    }
}
