//! `PortfolioRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait};

use domain_checkout_core::error::{CoreError, CoreResult};
use domain_checkout_core::traits::PortfolioRepository;
use domain_checkout_core::types::Portfolio;

use super::entity::portfolio;
use super::{SqliteStore, format_timestamp};

impl From<portfolio::Model> for Portfolio {
    fn from(model: portfolio::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            is_published: model.is_published != 0,
        }
    }
}

impl SqliteStore {
    /// Mirror a portfolio's ownership and publish state.
    ///
    /// Portfolios are owned by another part of the platform; this keeps the local
    /// copy the purchase checks read from in sync.
    pub async fn upsert_portfolio(&self, portfolio: &Portfolio) -> CoreResult<()> {
        let active_model = portfolio::ActiveModel {
            id: Set(portfolio.id.clone()),
            user_id: Set(portfolio.user_id.clone()),
            is_published: Set(i32::from(portfolio.is_published)),
            updated_at: Set(format_timestamp(chrono::Utc::now())),
        };

        portfolio::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(portfolio::Column::Id)
                    .update_columns([
                        portfolio::Column::UserId,
                        portfolio::Column::IsPublished,
                        portfolio::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save portfolio: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl PortfolioRepository for SqliteStore {
    async fn find_by_id(&self, portfolio_id: &str) -> CoreResult<Option<Portfolio>> {
        let row = portfolio::Entity::find_by_id(portfolio_id)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query portfolio: {e}")))?;

        Ok(row.map(Portfolio::from))
    }
}
