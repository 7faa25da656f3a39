//! Razorpay error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::RazorpayProvider;

/// Razorpay error code mapping
/// Reference: <https://razorpay.com/docs/errors/>
impl ProviderErrorMapper for RazorpayProvider {
    fn provider_name(&self) -> &'static str {
        "razorpay"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        // 401: key pair rejected, body code is BAD_REQUEST_ERROR
        if raw.http_status == Some(401) {
            return ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            };
        }

        let missing = raw.http_status == Some(404)
            || raw.message.to_ascii_lowercase().contains("does not exist");
        if missing && context.order_id.is_some() {
            return ProviderError::OrderNotFound {
                provider: self.provider_name().to_string(),
                order_id: context.order_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            };
        }

        match raw.code.as_deref() {
            Some("BAD_REQUEST_ERROR") if raw.field.is_some() => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: raw.field.unwrap_or_default(),
                detail: raw.message,
            },

            // Razorpay-side or bank-side outage
            Some("SERVER_ERROR" | "GATEWAY_ERROR") => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}
