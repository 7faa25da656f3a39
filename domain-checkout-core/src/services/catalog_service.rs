//! TLD 目录与可用性查询服务

use std::sync::Arc;

use futures::future::try_join_all;

use super::ServiceContext;
use crate::error::{CoreError, CoreResult};
use crate::types::{DomainAvailability, DomainOffer};
use crate::utils::domain_name::{MAX_LABEL_LEN, is_valid_label};

/// Read-only catalog queries.
pub struct CatalogService {
    ctx: Arc<ServiceContext>,
}

impl CatalogService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Available offers, cheapest first.
    pub async fn list_offers(&self) -> CoreResult<Vec<DomainOffer>> {
        let mut offers = self.ctx.offer_repository.list_available().await?;
        offers.sort_by(|a, b| a.base_price.cmp(&b.base_price).then_with(|| a.tld.cmp(&b.tld)));
        Ok(offers)
    }

    /// Whether `label` is free under each available TLD.
    pub async fn check_availability(&self, label: &str) -> CoreResult<Vec<DomainAvailability>> {
        let label = label.trim().to_ascii_lowercase();
        if !is_valid_label(&label) {
            return Err(CoreError::InvalidDomainName(format!(
                "'{label}': label must be 1-{MAX_LABEL_LEN} characters of a-z, 0-9 or '-'"
            )));
        }

        let offers = self.list_offers().await?;
        let repo = &self.ctx.user_domain_repository;
        try_join_all(offers.into_iter().map(|offer| {
            let full_domain = format!("{label}{}", offer.tld);
            async move {
                let taken = repo.exists_by_name(&full_domain).await?;
                Ok::<_, CoreError>(DomainAvailability {
                    tld: offer.tld,
                    full_domain,
                    price: offer.base_price,
                    renewal_price: offer.renewal_price,
                    currency: offer.currency,
                    available: !taken,
                })
            }
        }))
        .await
    }
}
