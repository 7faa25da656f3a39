//! Razorpay `PaymentProvider` trait 实现

use async_trait::async_trait;
use chrono::DateTime;

use crate::error::{ProviderError, Result};
use crate::traits::{ErrorContext, PaymentProvider, ProviderErrorMapper};
use crate::types::{
    CreateOrderRequest, MAX_ORDER_NOTES, OrderStatus, PaymentConfirmation, ProviderOrder,
};

use super::sign::verify_signature;
use super::{RazorpayOrder, RazorpayOrderBody, RazorpayProvider};

/// Razorpay receipt length limit.
const MAX_RECEIPT_LEN: usize = 40;

impl RazorpayProvider {
    /// 将 Razorpay 订单转换为统一结构
    pub(crate) fn convert_order(&self, order: RazorpayOrder) -> Result<ProviderOrder> {
        let currency = order
            .currency
            .parse()
            .map_err(|e: String| self.parse_error(e))?;
        let status = match order.status.as_str() {
            "created" => OrderStatus::Created,
            "attempted" => OrderStatus::Attempted,
            "paid" => OrderStatus::Paid,
            other => {
                log::warn!("[razorpay] Unrecognized order status '{other}' for {}", order.id);
                OrderStatus::Unknown
            }
        };

        Ok(ProviderOrder {
            id: order.id,
            amount_minor: order.amount,
            amount_paid_minor: order.amount_paid,
            currency,
            status,
            receipt: order.receipt,
            notes: order.notes,
            created_at: order
                .created_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn validate_request(&self, req: &CreateOrderRequest) -> Result<()> {
        let invalid = |param: &str, detail: String| ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: param.to_string(),
            detail,
        };
        if req.amount_minor == 0 {
            return Err(invalid("amount", "amount must be positive".to_string()));
        }
        if req.receipt.len() > MAX_RECEIPT_LEN {
            return Err(invalid(
                "receipt",
                format!("receipt exceeds {MAX_RECEIPT_LEN} characters"),
            ));
        }
        if req.notes.len() > MAX_ORDER_NOTES {
            return Err(invalid(
                "notes",
                format!("at most {MAX_ORDER_NOTES} notes are allowed"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for RazorpayProvider {
    fn id(&self) -> &'static str {
        "razorpay"
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, req: &CreateOrderRequest) -> Result<ProviderOrder> {
        self.validate_request(req)?;

        let body = RazorpayOrderBody {
            amount: req.amount_minor,
            currency: req.currency.code(),
            receipt: &req.receipt,
            notes: &req.notes,
        };
        let order: RazorpayOrder = self
            .post("/orders", &body, ErrorContext::default())
            .await?;

        log::info!(
            "[razorpay] Created order {} for {} {} (receipt {})",
            order.id,
            order.amount,
            order.currency,
            req.receipt
        );
        self.convert_order(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<ProviderOrder> {
        if order_id.trim().is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "order_id".to_string(),
                detail: "order id must not be empty".to_string(),
            });
        }

        let path = format!("/orders/{}", urlencoding::encode(order_id));
        let order: RazorpayOrder = self.get(&path, ErrorContext::for_order(order_id)).await?;
        self.convert_order(order)
    }

    fn verify_payment_signature(&self, confirmation: &PaymentConfirmation) -> bool {
        verify_signature(
            &self.key_secret,
            &confirmation.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        )
    }
}
