//! 域名注册服务

use std::sync::Arc;

use chrono::Utc;

use super::ServiceContext;
use crate::error::{CoreError, CoreResult};
use crate::types::{NewUserDomain, UserDomain, VerifiedPurchase};
use crate::utils::datetime::add_one_year;

/// Claims a domain for a user after payment has been verified.
///
/// Idempotent per `(user_id, domain_name)`: a replayed registration returns the
/// existing row. The storage unique constraint on `domain_name` decides races.
pub struct RegistrarService {
    ctx: Arc<ServiceContext>,
}

impl RegistrarService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Register `purchase` under `payment_id`.
    ///
    /// The domain and its mapping are written in one transaction. If the store
    /// rejects the coupon column the insert is retried exactly once without it.
    pub async fn register_domain(
        &self,
        purchase: &VerifiedPurchase,
        payment_id: &str,
    ) -> CoreResult<UserDomain> {
        let repo = &self.ctx.user_domain_repository;

        if let Some(existing) = repo.find_by_name(&purchase.domain_name).await? {
            return Self::replay_or_conflict(existing, purchase);
        }

        let coupon_code = if repo.capabilities().coupon_tracking {
            purchase.coupon_code.clone()
        } else {
            None
        };
        let mut new = Self::new_user_domain(purchase, payment_id, coupon_code);

        let inserted = match repo.insert_with_mapping(&new).await {
            Err(CoreError::SchemaIncompatible(detail)) if new.coupon_code.is_some() => {
                log::warn!(
                    "Storage rejected coupon_code for {} ({detail}), retrying without it",
                    new.domain_name
                );
                new.coupon_code = None;
                repo.insert_with_mapping(&new).await
            }
            other => other,
        };

        match inserted {
            Ok(domain) => {
                log::info!(
                    "Registered {} for user {} (payment {}, expires {})",
                    domain.domain_name,
                    domain.user_id,
                    domain_checkout_provider::mask_secret(&domain.payment_id),
                    domain.expiry_date.format("%Y-%m-%d")
                );
                Ok(domain)
            }
            Err(CoreError::DomainTaken(name)) => {
                // 并发注册失败：以唯一约束的胜者为准
                match repo.find_by_name(&purchase.domain_name).await? {
                    Some(winner) => Self::replay_or_conflict(winner, purchase),
                    None => Err(CoreError::DomainTaken(name)),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn replay_or_conflict(existing: UserDomain, purchase: &VerifiedPurchase) -> CoreResult<UserDomain> {
        if existing.user_id == purchase.user_id {
            log::info!(
                "Registration replay for {} (user {}), returning existing row",
                existing.domain_name,
                existing.user_id
            );
            Ok(existing)
        } else {
            Err(CoreError::DomainTaken(existing.domain_name))
        }
    }

    fn new_user_domain(
        purchase: &VerifiedPurchase,
        payment_id: &str,
        coupon_code: Option<String>,
    ) -> NewUserDomain {
        let now = Utc::now();
        NewUserDomain {
            id: uuid::Uuid::new_v4().to_string(),
            mapping_id: uuid::Uuid::new_v4().to_string(),
            user_id: purchase.user_id.clone(),
            domain_name: purchase.domain_name.clone(),
            tld: purchase.tld.clone(),
            portfolio_id: purchase.portfolio_id.clone(),
            expiry_date: add_one_year(now),
            payment_id: payment_id.to_string(),
            amount_paid: purchase.amount_paid,
            currency: purchase.currency,
            coupon_code,
            created_at: now,
        }
    }
}
