//! TLD 报价仓库抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::DomainOffer;

/// Read-only access to the TLD catalog.
#[async_trait]
pub trait DomainOfferRepository: Send + Sync {
    /// All offers currently marked available.
    async fn list_available(&self) -> CoreResult<Vec<DomainOffer>>;

    /// Offer for a TLD (leading dot, lowercase), available or not.
    ///
    /// # Returns
    /// * `Some(offer)` - TLD is in the catalog
    /// * `None` - TLD was never offered
    async fn find_by_tld(&self, tld: &str) -> CoreResult<Option<DomainOffer>>;
}
