//! # domain-checkout-provider
//!
//! Payment provider abstraction used by the domain checkout workflow: create an order
//! for a price, read it back (status and notes), and authenticate the signature the
//! client-side checkout returns after a successful payment.
//!
//! ## Supported Providers
//!
//! | Provider | Auth Method | Callback Signature |
//! |----------|-------------|--------------------|
//! | [Razorpay](https://razorpay.com/) | HTTP Basic (`key_id:key_secret`) | HMAC-SHA256 over `order_id\|payment_id` |
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)* : Use rustls.
//! - **`native-tls`** : Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use domain_checkout_provider::{
//!     create_provider, CreateOrderRequest, Currency, OrderNotes, PaymentConfirmation,
//!     ProviderCredentials,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Razorpay {
//!         key_id: "rzp_test_xxx".to_string(),
//!         key_secret: "secret".to_string(),
//!     })?;
//!
//!     // 1. Issue an order for 79.20 INR
//!     let order = provider
//!         .create_order(&CreateOrderRequest {
//!             amount_minor: 7920,
//!             currency: Currency::Inr,
//!             receipt: "domain_1700000000".to_string(),
//!             notes: OrderNotes::new(),
//!         })
//!         .await?;
//!
//!     // 2. After checkout, authenticate the callback
//!     let confirmation = PaymentConfirmation {
//!         order_id: order.id.clone(),
//!         payment_id: "pay_xxx".to_string(),
//!         signature: "<hex from checkout>".to_string(),
//!     };
//!     if provider.verify_payment_signature(&confirmation) {
//!         let paid = provider.fetch_order(&order.id).await?;
//!         println!("{} is {:?}", paid.id, paid.status);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::InvalidCredentials`] : key pair rejected
//! - [`ProviderError::OrderNotFound`] : unknown order id
//! - [`ProviderError::RateLimited`] : API rate limit exceeded (retryable)
//! - [`ProviderError::NetworkError`] : network connectivity issue (retryable)
//!
//! Order fetches are retried with exponential backoff on transient errors. Order
//! creation is not, since a replayed POST can create a second order.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::create_provider;

// Re-export core trait only (internal traits are not exported)
pub use traits::PaymentProvider;

pub use types::{
    CreateOrderRequest, CredentialValidationError, Currency, MAX_ORDER_NOTES, OrderNotes,
    OrderStatus, PaymentConfirmation, ProviderCredentials, ProviderOrder, ProviderType,
};

pub use http_client::RetryPolicy;

pub use providers::{RazorpayProvider, RazorpayProviderBuilder, sign_payment};

pub use utils::log_sanitizer::{mask_secret, truncate_for_log};
