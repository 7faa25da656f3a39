//! 作品集只读访问 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Portfolio;

/// Portfolios live outside this workspace. Only ownership and publication are read.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn find_by_id(&self, portfolio_id: &str) -> CoreResult<Option<Portfolio>>;
}
