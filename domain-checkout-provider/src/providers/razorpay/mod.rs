//! Razorpay payment provider

mod error;
mod http;
mod provider;
mod sign;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::http_client::RetryPolicy;
use crate::providers::common::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, create_http_client,
};

pub use sign::sign_payment;
pub(crate) use types::{RazorpayErrorEnvelope, RazorpayOrder, RazorpayOrderBody};

pub(crate) const RAZORPAY_API_BASE: &str = "https://api.razorpay.com/v1";

/// Razorpay Provider
pub struct RazorpayProvider {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) key_id: String,
    pub(crate) key_secret: String,
    pub(crate) fetch_retry: RetryPolicy,
}

/// Razorpay Provider Builder
pub struct RazorpayProviderBuilder {
    key_id: String,
    key_secret: String,
    api_base: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    fetch_retry: RetryPolicy,
}

impl RazorpayProviderBuilder {
    fn new(key_id: String, key_secret: String) -> Self {
        Self {
            key_id,
            key_secret,
            api_base: RAZORPAY_API_BASE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fetch_retry: RetryPolicy::default(),
        }
    }

    /// Override the API base URL (sandbox proxies, local fakes).
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Retry policy for order fetches. Order creation is never retried.
    pub fn fetch_retry(mut self, policy: RetryPolicy) -> Self {
        self.fetch_retry = policy;
        self
    }

    pub fn build(self) -> RazorpayProvider {
        RazorpayProvider {
            client: create_http_client(self.connect_timeout, self.request_timeout),
            api_base: self.api_base,
            key_id: self.key_id,
            key_secret: self.key_secret,
            fetch_retry: self.fetch_retry,
        }
    }
}

impl RazorpayProvider {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self::builder(key_id, key_secret).build()
    }

    pub fn builder(key_id: String, key_secret: String) -> RazorpayProviderBuilder {
        RazorpayProviderBuilder::new(key_id, key_secret)
    }
}
