//! 支付订单签发服务

use std::sync::Arc;

use domain_checkout_provider::CreateOrderRequest;

use super::{PricingService, ServiceContext};
use crate::error::{CoreError, CoreResult};
use crate::types::{IssuedOrder, OrderHandle, OrderMetadata, PurchaseIntent, PurchaseRequest};
use crate::utils::parse_domain;

/// Issues payment-provider orders for domain purchases.
///
/// Performs no durable mutation. The "domain taken" check here is advisory only;
/// the storage unique constraint decides at registration time.
pub struct OrderService {
    ctx: Arc<ServiceContext>,
    pricing: PricingService,
}

impl OrderService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let pricing = PricingService::new(Arc::clone(&ctx.settings.coupons));
        Self { ctx, pricing }
    }

    /// Validate a purchase request and issue an order for it.
    ///
    /// Checks run in a fixed order and stop at the first failure: domain syntax,
    /// availability, portfolio eligibility, TLD offer, then price. A zero payable
    /// amount skips the provider and returns [`IssuedOrder::Free`].
    pub async fn create_order(&self, req: &PurchaseRequest) -> CoreResult<IssuedOrder> {
        let intent = self.build_intent(req).await?;

        if intent.payable.is_zero() {
            log::info!(
                "Free claim issued for {} (user {}, coupon {:?})",
                intent.domain_name,
                intent.user_id,
                intent.coupon_code
            );
            return Ok(IssuedOrder::Free(intent));
        }

        let receipt = format!("domain_{}", uuid::Uuid::new_v4().simple());
        let order_req = CreateOrderRequest {
            amount_minor: intent.payable.minor(),
            currency: intent.currency,
            receipt: receipt.clone(),
            notes: OrderMetadata::new(intent.clone()).to_notes(),
        };

        let order = self
            .ctx
            .payment_provider
            .create_order(&order_req)
            .await
            .map_err(CoreError::from)?;

        log::info!(
            "Order {} issued for {} ({} {})",
            order.id,
            intent.domain_name,
            intent.payable,
            intent.currency.code()
        );

        Ok(IssuedOrder::Payment(OrderHandle {
            provider_order_id: order.id,
            amount: intent.payable,
            currency: intent.currency,
            key_id: self.ctx.payment_provider.key_id().to_string(),
            receipt,
        }))
    }

    /// Run the pre-payment checks and price the purchase.
    async fn build_intent(&self, req: &PurchaseRequest) -> CoreResult<PurchaseIntent> {
        // 1. 域名格式
        let domain = parse_domain(&req.domain_name, &req.tld)?;

        // 2. 是否已被注册（仅提示，最终以唯一约束为准）
        if self
            .ctx
            .user_domain_repository
            .exists_by_name(&domain.full)
            .await?
        {
            return Err(CoreError::DomainTaken(domain.full));
        }

        // 3. 作品集归属与发布状态
        self.ctx
            .eligible_portfolio(&req.user_id, &req.portfolio_id)
            .await?;

        // 4. TLD 报价
        let offer = self
            .ctx
            .offer_repository
            .find_by_tld(&domain.tld)
            .await?
            .filter(|o| o.is_available)
            .ok_or_else(|| CoreError::UnknownTld(domain.tld.clone()))?;

        // 5. 价格
        let quote = self
            .pricing
            .quote(offer.base_price, req.coupon_code.as_deref())?;
        if quote.payable != req.amount {
            return Err(CoreError::AmountMismatch {
                expected: quote.payable,
                supplied: req.amount,
            });
        }

        Ok(PurchaseIntent {
            user_id: req.user_id.clone(),
            domain_name: domain.full,
            tld: domain.tld,
            portfolio_id: req.portfolio_id.clone(),
            base_price: offer.base_price,
            coupon_code: quote.coupon.map(|c| c.code),
            payable: quote.payable,
            currency: offer.currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestEnv, purchase_request};
    use crate::types::{Amount, Currency};

    #[tokio::test]
    async fn issues_paid_order_with_metadata() {
        let env = TestEnv::new().await;
        let service = OrderService::new(env.ctx.clone());

        let req = purchase_request("mysite.dev", Amount::from_minor(7920), Some("save20"));
        let result = service.create_order(&req).await;

        let Ok(IssuedOrder::Payment(handle)) = result else {
            unreachable!("expected a payment order, got {result:?}");
        };
        assert_eq!(handle.amount, Amount::from_minor(7920));
        assert_eq!(handle.currency, Currency::Usd);
        assert_eq!(handle.key_id, "rzp_test_mock");
        assert!(handle.receipt.starts_with("domain_"));
        assert!(handle.receipt.len() <= 40);

        let created = env.payment.created_orders().await;
        assert_eq!(created.len(), 1);
        let meta = OrderMetadata::from_notes(&created[0].notes);
        assert!(matches!(
            meta,
            Ok(ref m) if m.intent.coupon_code.as_deref() == Some("SAVE20")
                && m.intent.domain_name == "mysite.dev"
                && m.intent.user_id == "user-1"
        ));
    }

    #[tokio::test]
    async fn free_coupon_skips_provider() {
        let env = TestEnv::new().await;
        let service = OrderService::new(env.ctx.clone());

        let req = purchase_request("mysite.dev", Amount::ZERO, Some("DEV100"));
        let result = service.create_order(&req).await;

        assert!(matches!(result, Ok(IssuedOrder::Free(ref i)) if i.payable.is_zero()));
        assert!(env.payment.created_orders().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_domain_name_first() {
        let env = TestEnv::new().await;
        let service = OrderService::new(env.ctx.clone());

        // 其他字段也都无效，但应先报域名错误
        let mut req = purchase_request("-bad-.dev", Amount::from_major(1), Some("BADCODE"));
        req.portfolio_id = "missing".to_string();
        let result = service.create_order(&req).await;
        assert!(matches!(result, Err(CoreError::InvalidDomainName(_))));
    }

    #[tokio::test]
    async fn taken_domain_is_rejected() {
        let env = TestEnv::new().await;
        env.register_existing("other-user", "mysite.dev").await;
        let service = OrderService::new(env.ctx.clone());

        let req = purchase_request("MySite.dev", Amount::from_major(99), None);
        let result = service.create_order(&req).await;
        assert!(matches!(result, Err(CoreError::DomainTaken(ref d)) if d == "mysite.dev"));
    }

    #[tokio::test]
    async fn unpublished_portfolio_is_rejected() {
        let env = TestEnv::new().await;
        env.portfolios.insert("pf-draft", "user-1", false).await;
        let service = OrderService::new(env.ctx.clone());

        let mut req = purchase_request("mysite.dev", Amount::from_major(99), None);
        req.portfolio_id = "pf-draft".to_string();
        let result = service.create_order(&req).await;
        assert!(matches!(result, Err(CoreError::PortfolioNotEligible(_))));
    }

    #[tokio::test]
    async fn someone_elses_portfolio_is_rejected() {
        let env = TestEnv::new().await;
        env.portfolios.insert("pf-other", "user-2", true).await;
        let service = OrderService::new(env.ctx.clone());

        let mut req = purchase_request("mysite.dev", Amount::from_major(99), None);
        req.portfolio_id = "pf-other".to_string();
        let result = service.create_order(&req).await;
        assert!(matches!(result, Err(CoreError::PortfolioNotEligible(_))));
    }

    #[tokio::test]
    async fn unavailable_tld_is_unknown() {
        let env = TestEnv::new().await;
        let service = OrderService::new(env.ctx.clone());

        let mut req = purchase_request("mysite.xyz", Amount::from_major(5), None);
        req.tld = ".xyz".to_string();
        assert!(matches!(
            service.create_order(&req).await,
            Err(CoreError::UnknownTld(_))
        ));

        // .io 在目录中但已下架
        let mut req = purchase_request("mysite.io", Amount::from_major(49), None);
        req.tld = "io".to_string();
        assert!(matches!(
            service.create_order(&req).await,
            Err(CoreError::UnknownTld(ref t)) if t == ".io"
        ));
    }

    #[tokio::test]
    async fn amount_mismatch_reports_expected() {
        let env = TestEnv::new().await;
        let service = OrderService::new(env.ctx.clone());

        let req = purchase_request("mysite.dev", Amount::from_major(1), Some("SAVE20"));
        let result = service.create_order(&req).await;
        assert!(matches!(
            result,
            Err(CoreError::AmountMismatch { expected, supplied })
                if expected == Amount::from_minor(7920) && supplied == Amount::from_major(1)
        ));
        assert!(env.payment.created_orders().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_coupon_is_invalid_coupon() {
        let env = TestEnv::new().await;
        let service = OrderService::new(env.ctx.clone());

        let req = purchase_request("mysite.dev", Amount::from_major(99), Some("BADCODE"));
        assert!(matches!(
            service.create_order(&req).await,
            Err(CoreError::InvalidCoupon(_))
        ));
    }

    #[tokio::test]
    async fn provider_outage_is_retryable() {
        let env = TestEnv::new().await;
        env.payment.fail_create_with_timeout(true).await;
        let service = OrderService::new(env.ctx.clone());

        let req = purchase_request("mysite.dev", Amount::from_major(99), None);
        let result = service.create_order(&req).await;
        assert!(matches!(result, Err(ref e) if e.is_retryable()), "{result:?}");
    }
}
