//! `DomainOfferRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use domain_checkout_core::error::{CoreError, CoreResult};
use domain_checkout_core::traits::DomainOfferRepository;
use domain_checkout_core::types::DomainOffer;

use super::entity::domain_offer;
use super::{SqliteStore, format_timestamp, from_minor, to_minor};

impl domain_offer::Model {
    fn into_offer(self) -> CoreResult<DomainOffer> {
        let currency = self
            .currency
            .parse()
            .map_err(|e: String| CoreError::SerializationError(e))?;

        Ok(DomainOffer {
            base_price: from_minor(self.base_price_minor, "base_price_minor")?,
            renewal_price: from_minor(self.renewal_price_minor, "renewal_price_minor")?,
            tld: self.tld,
            currency,
            is_available: self.is_available != 0,
        })
    }
}

fn offer_to_active_model(offer: &DomainOffer) -> CoreResult<domain_offer::ActiveModel> {
    Ok(domain_offer::ActiveModel {
        tld: Set(offer.tld.clone()),
        base_price_minor: Set(to_minor(offer.base_price)?),
        renewal_price_minor: Set(to_minor(offer.renewal_price)?),
        currency: Set(offer.currency.code().to_string()),
        is_available: Set(i32::from(offer.is_available)),
        updated_at: Set(format_timestamp(chrono::Utc::now())),
    })
}

impl SqliteStore {
    /// Insert or update TLD offers (pricing is managed outside the purchase flow).
    pub async fn seed_offers(&self, offers: &[DomainOffer]) -> CoreResult<()> {
        for offer in offers {
            domain_offer::Entity::insert(offer_to_active_model(offer)?)
                .on_conflict(
                    sea_orm::sea_query::OnConflict::column(domain_offer::Column::Tld)
                        .update_columns([
                            domain_offer::Column::BasePriceMinor,
                            domain_offer::Column::RenewalPriceMinor,
                            domain_offer::Column::Currency,
                            domain_offer::Column::IsAvailable,
                            domain_offer::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| CoreError::StorageError(format!("Failed to save offer: {e}")))?;
        }

        log::info!("Seeded {} domain offers", offers.len());
        Ok(())
    }
}

#[async_trait]
impl DomainOfferRepository for SqliteStore {
    async fn list_available(&self) -> CoreResult<Vec<DomainOffer>> {
        let rows = domain_offer::Entity::find()
            .filter(domain_offer::Column::IsAvailable.ne(0))
            .order_by_asc(domain_offer::Column::Tld)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query offers: {e}")))?;

        rows.into_iter()
            .map(domain_offer::Model::into_offer)
            .collect()
    }

    async fn find_by_tld(&self, tld: &str) -> CoreResult<Option<DomainOffer>> {
        let row = domain_offer::Entity::find_by_id(tld)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query offer: {e}")))?;

        row.map(domain_offer::Model::into_offer).transpose()
    }
}
