//! Razorpay HTTP 请求方法

use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpUtils, RetryPolicy};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{RazorpayErrorEnvelope, RazorpayOrderBody, RazorpayProvider};

impl RazorpayProvider {
    /// 执行 GET 请求（幂等，按 `fetch_retry` 重试）
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let request = self
            .client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret));

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            path,
            self.fetch_retry,
        )
        .await?;

        self.handle_response(status, &response_text, ctx)
    }

    /// 执行 POST 请求（不重试，调用方决定是否重放）
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &RazorpayOrderBody<'_>,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        let url = format!("{}{path}", self.api_base);
        let request = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .header("Content-Type", "application/json")
            .body(payload);

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "POST",
            path,
            RetryPolicy::none(),
        )
        .await?;

        self.handle_response(status, &response_text, ctx)
    }

    /// 2xx 解析为目标类型，其余解析 Razorpay 错误体并映射
    fn handle_response<T: DeserializeOwned>(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        if (200..300).contains(&status) {
            return HttpUtils::parse_json(response_text, self.provider_name());
        }

        let raw = match serde_json::from_str::<RazorpayErrorEnvelope>(response_text) {
            Ok(envelope) => RawApiError::with_code(envelope.error.code, envelope.error.description)
                .field(envelope.error.field),
            Err(_) => RawApiError::new(format!("HTTP {status}")),
        }
        .status(status);

        log::warn!(
            "[{}] API error (HTTP {status}): {:?} - {}",
            self.provider_name(),
            raw.code,
            raw.message
        );
        Err(self.map_error(raw, ctx))
    }
}
