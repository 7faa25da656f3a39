//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use domain_checkout_provider::{
    CreateOrderRequest, Currency, OrderNotes, PaymentProvider, ProviderCredentials,
    create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试 receipt（Razorpay 限制 40 字符）
pub fn generate_test_receipt() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test_{}", &uuid.simple().to_string()[..16])
}

/// 最小的测试订单：1.00 INR
pub fn test_order_request(notes: OrderNotes) -> CreateOrderRequest {
    CreateOrderRequest {
        amount_minor: 100,
        currency: Currency::Inr,
        receipt: generate_test_receipt(),
        notes,
    }
}

/// 测试上下文 - 封装 Provider 和原始密钥
pub struct TestContext {
    pub provider: Arc<dyn PaymentProvider>,
    pub key_secret: String,
}

impl TestContext {
    /// 创建 Razorpay 测试上下文（仅限 rzp_test_ 密钥）
    pub fn razorpay() -> Option<Self> {
        let key_id = env::var("RAZORPAY_KEY_ID").ok()?;
        let key_secret = env::var("RAZORPAY_KEY_SECRET").ok()?;
        if !key_id.starts_with("rzp_test_") {
            eprintln!("跳过测试: 只允许使用 rzp_test_ 测试密钥");
            return None;
        }

        let provider = create_provider(ProviderCredentials::Razorpay {
            key_id,
            key_secret: key_secret.clone(),
        })
        .ok()?;

        Some(Self {
            provider,
            key_secret,
        })
    }
}
