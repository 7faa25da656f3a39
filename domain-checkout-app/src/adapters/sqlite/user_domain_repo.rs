//! `UserDomainRepository` implementation for `SqliteStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Iterable, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, SelectModel, Selector, SqlErr, TransactionTrait,
    sea_query::Expr,
};

use domain_checkout_core::error::{CoreError, CoreResult};
use domain_checkout_core::traits::UserDomainRepository;
use domain_checkout_core::types::{
    DomainMapping, NewUserDomain, SslStatus, StorageCapabilities, UserDomain,
    UserDomainWithMapping,
};

use super::entity::{domain_mapping, user_domain};
use super::{SqliteStore, format_timestamp, from_minor, parse_timestamp, to_minor};

impl user_domain::Model {
    fn into_user_domain(self) -> CoreResult<UserDomain> {
        let currency = self
            .currency
            .parse()
            .map_err(|e: String| CoreError::SerializationError(e))?;

        Ok(UserDomain {
            expiry_date: parse_timestamp(&self.expiry_date, "expiry_date")?,
            created_at: parse_timestamp(&self.created_at, "created_at")?,
            updated_at: parse_timestamp(&self.updated_at, "updated_at")?,
            amount_paid: from_minor(self.amount_paid_minor, "amount_paid_minor")?,
            id: self.id,
            user_id: self.user_id,
            domain_name: self.domain_name,
            tld: self.tld,
            portfolio_id: self.portfolio_id,
            is_active: self.is_active != 0,
            is_verified: self.is_verified != 0,
            payment_id: self.payment_id,
            currency,
            coupon_code: self.coupon_code,
        })
    }
}

impl domain_mapping::Model {
    fn into_mapping(self) -> CoreResult<DomainMapping> {
        let ssl_status: SslStatus = self
            .ssl_status
            .parse()
            .map_err(|e: String| CoreError::SerializationError(e))?;

        Ok(DomainMapping {
            updated_at: parse_timestamp(&self.updated_at, "updated_at")?,
            id: self.id,
            user_domain_id: self.user_domain_id,
            portfolio_id: self.portfolio_id,
            is_active: self.is_active != 0,
            dns_configured: self.dns_configured != 0,
            ssl_status,
        })
    }
}

/// Map an insert failure: unique violation → `DomainTaken`, missing column → `SchemaIncompatible`.
fn map_insert_error(e: &DbErr, domain_name: &str) -> CoreError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return CoreError::DomainTaken(domain_name.to_string());
    }
    let message = e.to_string();
    if message.contains("no column named") || message.contains("no such column") {
        return CoreError::SchemaIncompatible(message);
    }
    CoreError::StorageError(format!("Failed to insert user domain: {message}"))
}

fn storage_error(action: &str) -> impl Fn(DbErr) -> CoreError + '_ {
    move |e| CoreError::StorageError(format!("Failed to {action}: {e}"))
}

impl SqliteStore {
    /// `SELECT` for user domains that works whether or not `coupon_code` exists.
    fn user_domain_rows(
        &self,
        query: Select<user_domain::Entity>,
    ) -> Selector<SelectModel<user_domain::Model>> {
        if self.capabilities.coupon_tracking {
            return query.into_model();
        }
        query
            .select_only()
            .columns(
                user_domain::Column::iter()
                    .filter(|c| !matches!(c, user_domain::Column::CouponCode)),
            )
            .column_as(Expr::cust("NULL"), "coupon_code")
            .into_model()
    }

    async fn load_user_domain(&self, user_domain_id: &str) -> CoreResult<Option<UserDomain>> {
        let row = self
            .user_domain_rows(user_domain::Entity::find_by_id(user_domain_id))
            .one(&self.db)
            .await
            .map_err(storage_error("query user domain"))?;

        row.map(user_domain::Model::into_user_domain).transpose()
    }

    async fn require_user_domain(&self, user_domain_id: &str) -> CoreResult<UserDomain> {
        self.load_user_domain(user_domain_id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(user_domain_id.to_string()))
    }

    /// Apply the same `SET` to a user domain and its mapping in one transaction.
    async fn update_with_mapping(
        &self,
        user_domain_id: &str,
        domain_sets: Vec<(user_domain::Column, Expr)>,
        mapping_sets: Vec<(domain_mapping::Column, Expr)>,
    ) -> CoreResult<UserDomain> {
        let now = format_timestamp(Utc::now());
        let txn = self.db.begin().await.map_err(storage_error("begin transaction"))?;

        let mut update = user_domain::Entity::update_many()
            .col_expr(user_domain::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(user_domain::Column::Id.eq(user_domain_id));
        for (col, expr) in domain_sets {
            update = update.col_expr(col, expr);
        }
        let result = update
            .exec(&txn)
            .await
            .map_err(storage_error("update user domain"))?;
        if result.rows_affected == 0 {
            return Err(CoreError::DomainNotFound(user_domain_id.to_string()));
        }

        let mut update = domain_mapping::Entity::update_many()
            .col_expr(domain_mapping::Column::UpdatedAt, Expr::value(now))
            .filter(domain_mapping::Column::UserDomainId.eq(user_domain_id));
        for (col, expr) in mapping_sets {
            update = update.col_expr(col, expr);
        }
        update
            .exec(&txn)
            .await
            .map_err(storage_error("update domain mapping"))?;

        txn.commit().await.map_err(storage_error("commit transaction"))?;

        self.require_user_domain(user_domain_id).await
    }

    async fn insert_rows<C: ConnectionTrait>(
        &self,
        conn: &C,
        new: &NewUserDomain,
    ) -> CoreResult<()> {
        let created_at = format_timestamp(new.created_at);

        // 旧表结构没有 coupon_code 列：无优惠券时不写该列
        let coupon_code = match &new.coupon_code {
            None if !self.capabilities.coupon_tracking => NotSet,
            other => Set(other.clone()),
        };

        let domain = user_domain::ActiveModel {
            id: Set(new.id.clone()),
            user_id: Set(new.user_id.clone()),
            domain_name: Set(new.domain_name.clone()),
            tld: Set(new.tld.clone()),
            portfolio_id: Set(new.portfolio_id.clone()),
            expiry_date: Set(format_timestamp(new.expiry_date)),
            is_active: Set(1),
            is_verified: Set(0),
            payment_id: Set(new.payment_id.clone()),
            amount_paid_minor: Set(to_minor(new.amount_paid)?),
            currency: Set(new.currency.code().to_string()),
            coupon_code,
            created_at: Set(created_at.clone()),
            updated_at: Set(created_at.clone()),
        };
        user_domain::Entity::insert(domain)
            .exec_without_returning(conn)
            .await
            .map_err(|e| map_insert_error(&e, &new.domain_name))?;

        let mapping = domain_mapping::ActiveModel {
            id: Set(new.mapping_id.clone()),
            user_domain_id: Set(new.id.clone()),
            portfolio_id: Set(new.portfolio_id.clone()),
            is_active: Set(1),
            dns_configured: Set(0),
            ssl_status: Set(SslStatus::Pending.as_str().to_string()),
            updated_at: Set(created_at),
        };
        domain_mapping::Entity::insert(mapping)
            .exec_without_returning(conn)
            .await
            .map_err(storage_error("insert domain mapping"))?;

        Ok(())
    }
}

#[async_trait]
impl UserDomainRepository for SqliteStore {
    fn capabilities(&self) -> StorageCapabilities {
        self.capabilities
    }

    async fn exists_by_name(&self, domain_name: &str) -> CoreResult<bool> {
        let count = user_domain::Entity::find()
            .select_only()
            .column(user_domain::Column::Id)
            .filter(user_domain::Column::DomainName.eq(domain_name))
            .count(&self.db)
            .await
            .map_err(storage_error("query user domain"))?;

        Ok(count > 0)
    }

    async fn find_by_name(&self, domain_name: &str) -> CoreResult<Option<UserDomain>> {
        let row = self
            .user_domain_rows(
                user_domain::Entity::find()
                    .filter(user_domain::Column::DomainName.eq(domain_name)),
            )
            .one(&self.db)
            .await
            .map_err(storage_error("query user domain"))?;

        row.map(user_domain::Model::into_user_domain).transpose()
    }

    async fn find_by_id(&self, user_domain_id: &str) -> CoreResult<Option<UserDomain>> {
        self.load_user_domain(user_domain_id).await
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<UserDomainWithMapping>> {
        let rows = self
            .user_domain_rows(
                user_domain::Entity::find()
                    .filter(user_domain::Column::UserId.eq(user_id))
                    .order_by_desc(user_domain::Column::CreatedAt),
            )
            .all(&self.db)
            .await
            .map_err(storage_error("query user domains"))?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut mappings: HashMap<String, DomainMapping> = HashMap::new();
        if !ids.is_empty() {
            let mapping_rows = domain_mapping::Entity::find()
                .filter(domain_mapping::Column::UserDomainId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(storage_error("query domain mappings"))?;
            for row in mapping_rows {
                let mapping = row.into_mapping()?;
                mappings.insert(mapping.user_domain_id.clone(), mapping);
            }
        }

        rows.into_iter()
            .map(|row| {
                let domain = row.into_user_domain()?;
                let mapping = mappings.remove(&domain.id);
                Ok(UserDomainWithMapping { domain, mapping })
            })
            .collect()
    }

    async fn find_mapping(&self, user_domain_id: &str) -> CoreResult<Option<DomainMapping>> {
        let row = domain_mapping::Entity::find()
            .filter(domain_mapping::Column::UserDomainId.eq(user_domain_id))
            .one(&self.db)
            .await
            .map_err(storage_error("query domain mapping"))?;

        row.map(domain_mapping::Model::into_mapping).transpose()
    }

    async fn insert_with_mapping(&self, new: &NewUserDomain) -> CoreResult<UserDomain> {
        let txn = self.db.begin().await.map_err(storage_error("begin transaction"))?;
        // 出错时 txn 被 drop，自动回滚
        self.insert_rows(&txn, new).await?;
        txn.commit().await.map_err(storage_error("commit transaction"))?;

        log::info!("Registered domain {} for user {}", new.domain_name, new.user_id);
        self.require_user_domain(&new.id).await
    }

    async fn mark_verified(&self, user_domain_id: &str) -> CoreResult<UserDomain> {
        self.update_with_mapping(
            user_domain_id,
            vec![(user_domain::Column::IsVerified, Expr::value(1))],
            vec![
                (domain_mapping::Column::DnsConfigured, Expr::value(1)),
                (
                    domain_mapping::Column::SslStatus,
                    Expr::value(SslStatus::Active.as_str()),
                ),
            ],
        )
        .await
    }

    async fn reassign_portfolio(
        &self,
        user_domain_id: &str,
        portfolio_id: &str,
    ) -> CoreResult<UserDomain> {
        self.update_with_mapping(
            user_domain_id,
            vec![(user_domain::Column::PortfolioId, Expr::value(portfolio_id))],
            vec![(domain_mapping::Column::PortfolioId, Expr::value(portfolio_id))],
        )
        .await
    }

    async fn deactivate(&self, user_domain_id: &str) -> CoreResult<UserDomain> {
        self.update_with_mapping(
            user_domain_id,
            vec![(user_domain::Column::IsActive, Expr::value(0))],
            vec![(domain_mapping::Column::IsActive, Expr::value(0))],
        )
        .await
    }
}
