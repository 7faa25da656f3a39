//! 支付回调验证服务

use std::sync::Arc;

use domain_checkout_provider::{OrderStatus, PaymentConfirmation, mask_secret};

use super::{PricingService, ServiceContext};
use crate::error::{CoreError, CoreResult};
use crate::types::{OrderMetadata, PurchaseIntent, VerifiedPurchase};
use crate::utils::parse_domain;

/// Authenticates checkout callbacks and free claims.
///
/// Produces a [`VerifiedPurchase`] without any durable side effect, so repeated
/// calls with the same input give the same answer.
pub struct PaymentVerificationService {
    ctx: Arc<ServiceContext>,
    pricing: PricingService,
}

impl PaymentVerificationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let pricing = PricingService::new(Arc::clone(&ctx.settings.coupons));
        Self { ctx, pricing }
    }

    /// Verify a paid checkout callback for `claimed_user_id`.
    ///
    /// Order of checks: signature, paid status, metadata decode, user, amount.
    /// Authenticity failures are logged with full detail here and surface to the
    /// caller only as a generic message (see [`CoreError::public_message`]).
    pub async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
        claimed_user_id: &str,
    ) -> CoreResult<VerifiedPurchase> {
        let result = self.verify_payment_inner(confirmation, claimed_user_id).await;
        if let Err(e) = &result {
            if e.kind() == crate::error::ErrorKind::Authenticity {
                log::error!(
                    "Payment verification rejected: order={}, payment={}, signature={}, user={claimed_user_id}: {e}",
                    confirmation.order_id,
                    confirmation.payment_id,
                    mask_secret(&confirmation.signature),
                );
            }
        }
        result
    }

    async fn verify_payment_inner(
        &self,
        confirmation: &PaymentConfirmation,
        claimed_user_id: &str,
    ) -> CoreResult<VerifiedPurchase> {
        let provider = &self.ctx.payment_provider;

        // 1. 签名（常数时间比较）
        if !provider.verify_payment_signature(confirmation) {
            return Err(CoreError::InvalidSignature(confirmation.order_id.clone()));
        }

        // 2. 订单状态
        let order = provider
            .fetch_order(&confirmation.order_id)
            .await
            .map_err(CoreError::from)?;
        if order.status != OrderStatus::Paid {
            return Err(CoreError::PaymentNotCompleted {
                order_id: order.id,
                status: order.status.as_str().to_string(),
            });
        }

        // 3. 元数据（失败即拒绝）
        let intent = OrderMetadata::from_notes(&order.notes)?.intent;
        if intent.user_id != claimed_user_id {
            return Err(CoreError::UserMismatch { order_id: order.id });
        }
        if order.amount_minor != intent.payable.minor() || order.currency != intent.currency {
            return Err(CoreError::MalformedOrderMetadata(format!(
                "order {} charged {} minor {} but metadata says {} {}",
                order.id,
                order.amount_minor,
                order.currency.code(),
                intent.payable,
                intent.currency.code()
            )));
        }

        log::info!(
            "Payment {} verified for {} (order {}, user {claimed_user_id})",
            mask_secret(&confirmation.payment_id),
            intent.domain_name,
            order.id
        );
        Ok(intent.into())
    }

    /// Verify a zero-amount claim issued by the order service.
    ///
    /// There is no provider order to authenticate, so the claim is re-derived from
    /// current state: the domain syntax, the offer price and coupon must still come
    /// to zero, and the portfolio must still be the caller's and published.
    pub async fn verify_free_claim(
        &self,
        intent: &PurchaseIntent,
        user_id: &str,
    ) -> CoreResult<VerifiedPurchase> {
        if intent.user_id != user_id {
            log::error!(
                "Free claim for {} rejected: issued for {}, claimed by {user_id}",
                intent.domain_name,
                intent.user_id
            );
            return Err(CoreError::UserMismatch {
                order_id: format!("free:{}", intent.domain_name),
            });
        }

        let domain = parse_domain(&intent.domain_name, &intent.tld)?;

        let offer = self
            .ctx
            .offer_repository
            .find_by_tld(&domain.tld)
            .await?
            .filter(|o| o.is_available)
            .ok_or_else(|| CoreError::UnknownTld(domain.tld.clone()))?;
        let payable = self
            .pricing
            .resolve_price(offer.base_price, intent.coupon_code.as_deref())?;
        if !payable.is_zero() || !intent.payable.is_zero() {
            return Err(CoreError::AmountMismatch {
                expected: payable,
                supplied: intent.payable,
            });
        }

        self.ctx
            .eligible_portfolio(user_id, &intent.portfolio_id)
            .await?;

        Ok(VerifiedPurchase {
            user_id: user_id.to_string(),
            domain_name: domain.full,
            tld: domain.tld,
            portfolio_id: intent.portfolio_id.clone(),
            amount_paid: payable,
            currency: offer.currency,
            coupon_code: intent.coupon_code.clone(),
        })
    }
}
