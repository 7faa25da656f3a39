//! 用户域名持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{
    DomainMapping, NewUserDomain, StorageCapabilities, UserDomain, UserDomainWithMapping,
};

/// 用户域名仓库 Trait
///
/// 平台实现:
/// - `SqliteStore` (`SeaORM`, domain-checkout-app)
/// - `MockUserDomainRepository` (tests)
#[async_trait]
pub trait UserDomainRepository: Send + Sync {
    /// Optional features this store supports. Probed once at startup.
    fn capabilities(&self) -> StorageCapabilities;

    /// Any row (active or not) holds `domain_name`.
    async fn exists_by_name(&self, domain_name: &str) -> CoreResult<bool>;

    async fn find_by_name(&self, domain_name: &str) -> CoreResult<Option<UserDomain>>;

    async fn find_by_id(&self, user_domain_id: &str) -> CoreResult<Option<UserDomain>>;

    /// A user's domains with their mappings, newest first.
    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<UserDomainWithMapping>>;

    async fn find_mapping(&self, user_domain_id: &str) -> CoreResult<Option<DomainMapping>>;

    /// Insert a user domain and its mapping in one transaction.
    ///
    /// # Errors
    /// * `DomainTaken` - the unique constraint on `domain_name` fired
    /// * `SchemaIncompatible` - the store cannot persist `coupon_code`
    async fn insert_with_mapping(&self, new: &NewUserDomain) -> CoreResult<UserDomain>;

    /// Set `is_verified` and mark the mapping DNS-configured with active SSL, atomically.
    async fn mark_verified(&self, user_domain_id: &str) -> CoreResult<UserDomain>;

    /// Point the domain and its mapping at another portfolio, atomically.
    async fn reassign_portfolio(
        &self,
        user_domain_id: &str,
        portfolio_id: &str,
    ) -> CoreResult<UserDomain>;

    /// Deactivate the domain and its mapping. Rows are never deleted.
    async fn deactivate(&self, user_domain_id: &str) -> CoreResult<UserDomain>;
}
