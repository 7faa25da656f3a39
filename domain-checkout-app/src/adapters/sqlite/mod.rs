//! SQLite-based unified store using `SeaORM`.
//!
//! A single `SqliteStore` implements `DomainOfferRepository`, `PortfolioRepository`
//! and `UserDomainRepository` against one local `SQLite` database.

mod offer_repo;
mod portfolio_repo;
mod user_domain_repo;
pub(crate) mod entity;
mod migration;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use domain_checkout_core::error::{CoreError, CoreResult};
use domain_checkout_core::types::{Amount, StorageCapabilities};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::{MigratorTrait, SchemaManager};

use migration::Migrator;

/// SQLite-based unified store.
///
/// Optional columns are probed once at construction and exposed through
/// [`StorageCapabilities`]. A database whose `user_domains` table predates coupon
/// tracking keeps working, it just never records coupon codes.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
    pub(crate) capabilities: StorageCapabilities,
}

impl SqliteStore {
    /// Open (or create) the database and apply every pending migration.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        Self::connect(db_path, None).await
    }

    /// Open the database applying at most `migration_steps` pending migrations.
    ///
    /// `None` applies all of them. Passing a limit leaves the schema at an older
    /// version, which is how a store behind on migrations is reproduced.
    pub async fn connect(db_path: &Path, migration_steps: Option<u32>) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        Migrator::up(&db, migration_steps)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        let capabilities = probe_capabilities(&db).await?;
        if !capabilities.coupon_tracking {
            log::warn!("user_domains.coupon_code is missing, coupon codes will not be recorded");
        }

        Ok(Self { db, capabilities })
    }
}

async fn probe_capabilities(db: &DatabaseConnection) -> CoreResult<StorageCapabilities> {
    let coupon_tracking = SchemaManager::new(db)
        .has_column("user_domains", "coupon_code")
        .await
        .map_err(|e| CoreError::StorageError(format!("Failed to inspect schema: {e}")))?;

    Ok(StorageCapabilities { coupon_tracking })
}

/// Fixed-width UTC timestamp, so that string order matches time order.
pub(crate) fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str, field: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}

pub(crate) fn to_minor(amount: Amount) -> CoreResult<i64> {
    i64::try_from(amount.minor())
        .map_err(|_| CoreError::SerializationError(format!("Amount out of range: {amount}")))
}

pub(crate) fn from_minor(minor: i64, field: &str) -> CoreResult<Amount> {
    u64::try_from(minor)
        .map(Amount::from_minor)
        .map_err(|_| CoreError::SerializationError(format!("Invalid {field}: {minor}")))
}
