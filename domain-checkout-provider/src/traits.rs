use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{CreateOrderRequest, PaymentConfirmation, ProviderOrder};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// 触发错误的字段（Razorpay 的 `error.field`）
    pub field: Option<String>,
    /// HTTP 状态码
    pub http_status: Option<u16>,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            field: None,
            http_status: None,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::new(message)
        }
    }

    #[must_use]
    pub fn field(mut self, field: Option<String>) -> Self {
        self.field = field;
        self
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 订单 ID（用于 `OrderNotFound`）
    pub order_id: Option<String>,
}

impl ErrorContext {
    pub fn for_order(order_id: &str) -> Self {
        Self {
            order_id: Some(order_id.to_string()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Payment provider capable of issuing orders and authenticating checkout callbacks.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Public key id handed to the client-side checkout widget.
    fn key_id(&self) -> &str;

    /// Create an order. Never retried automatically.
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<ProviderOrder>;

    /// Fetch an order by id, including its notes.
    async fn fetch_order(&self, order_id: &str) -> Result<ProviderOrder>;

    /// Check the checkout callback signature.
    ///
    /// Returns `false` for any mismatch, including malformed hex. The comparison
    /// runs in constant time.
    fn verify_payment_signature(&self, confirmation: &PaymentConfirmation) -> bool;
}
