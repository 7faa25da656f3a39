//! 结账编排服务
//!
//! Joins the order, verification and registration steps so a client only needs two
//! calls: start a checkout, then complete it with the provider callback.

use std::sync::Arc;

use domain_checkout_provider::PaymentConfirmation;

use super::{OrderService, PaymentVerificationService, RegistrarService, ServiceContext};
use crate::error::{CoreError, CoreResult};
use crate::types::{CheckoutOutcome, IssuedOrder, PurchaseRequest, UserDomain};

/// Prefix of synthetic payment ids for zero-amount claims.
pub const FREE_PAYMENT_PREFIX: &str = "free_";

pub struct CheckoutService {
    orders: OrderService,
    verifier: PaymentVerificationService,
    registrar: RegistrarService,
}

impl CheckoutService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            orders: OrderService::new(Arc::clone(&ctx)),
            verifier: PaymentVerificationService::new(Arc::clone(&ctx)),
            registrar: RegistrarService::new(ctx),
        }
    }

    /// Issue an order, or claim the domain right away when it is free.
    pub async fn start_checkout(&self, req: &PurchaseRequest) -> CoreResult<CheckoutOutcome> {
        let result = async {
            match self.orders.create_order(req).await? {
                IssuedOrder::Payment(handle) => Ok(CheckoutOutcome::PaymentRequired(handle)),
                IssuedOrder::Free(intent) => {
                    let verified = self.verifier.verify_free_claim(&intent, &req.user_id).await?;
                    let payment_id = format!("{FREE_PAYMENT_PREFIX}{}", uuid::Uuid::new_v4());
                    let domain = self.registrar.register_domain(&verified, &payment_id).await?;
                    Ok(CheckoutOutcome::Claimed(domain))
                }
            }
        }
        .await;
        result.inspect_err(|e: &CoreError| e.log("start_checkout"))
    }

    /// Verify a provider callback and register the purchased domain.
    ///
    /// Safe to call again with the same callback: the registration is replayed.
    pub async fn complete_checkout(
        &self,
        user_id: &str,
        confirmation: &PaymentConfirmation,
    ) -> CoreResult<UserDomain> {
        let result = async {
            let verified = self.verifier.verify_payment(confirmation, user_id).await?;
            self.registrar
                .register_domain(&verified, &confirmation.payment_id)
                .await
        }
        .await;
        result.inspect_err(|e: &CoreError| e.log("complete_checkout"))
    }
}
