//! 用户域名管理服务

use std::sync::Arc;

use super::ServiceContext;
use crate::error::{CoreError, CoreResult};
use crate::types::{UserDomain, UserDomainWithMapping};

/// Owner-facing management of claimed domains and host resolution for routing.
pub struct UserDomainService {
    ctx: Arc<ServiceContext>,
}

impl UserDomainService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// A user's domains with their mappings, newest first.
    pub async fn list_user_domains(&self, user_id: &str) -> CoreResult<Vec<UserDomainWithMapping>> {
        self.ctx.user_domain_repository.list_by_user(user_id).await
    }

    /// Point a domain at another of the user's published portfolios.
    pub async fn reassign_portfolio(
        &self,
        user_id: &str,
        user_domain_id: &str,
        portfolio_id: &str,
    ) -> CoreResult<UserDomain> {
        let domain = self.ctx.owned_domain(user_id, user_domain_id).await?;
        if !domain.is_active {
            return Err(CoreError::ValidationError(format!(
                "Domain {} is inactive",
                domain.domain_name
            )));
        }
        self.ctx.eligible_portfolio(user_id, portfolio_id).await?;

        let updated = self
            .ctx
            .user_domain_repository
            .reassign_portfolio(&domain.id, portfolio_id)
            .await?;
        log::info!(
            "Domain {} now points at portfolio {portfolio_id}",
            updated.domain_name
        );
        Ok(updated)
    }

    /// Deactivate a domain and its mapping. The row is kept.
    pub async fn deactivate_domain(
        &self,
        user_id: &str,
        user_domain_id: &str,
    ) -> CoreResult<UserDomain> {
        let domain = self.ctx.owned_domain(user_id, user_domain_id).await?;
        if !domain.is_active {
            return Ok(domain);
        }
        let updated = self
            .ctx
            .user_domain_repository
            .deactivate(&domain.id)
            .await?;
        log::info!("Domain {} deactivated", updated.domain_name);
        Ok(updated)
    }

    /// The active, verified registration serving `host`, if any.
    ///
    /// Hosts whose portfolio is no longer published resolve to `None`.
    pub async fn resolve_host(&self, host: &str) -> CoreResult<Option<UserDomain>> {
        let host = host.trim().to_ascii_lowercase();
        let host = host
            .split(':')
            .next()
            .unwrap_or_default()
            .trim_end_matches('.');
        if host.is_empty() {
            return Ok(None);
        }

        let Some(domain) = self
            .ctx
            .user_domain_repository
            .find_by_name(host)
            .await?
            .filter(|d| d.is_active && d.is_verified)
        else {
            return Ok(None);
        };

        let published = self
            .ctx
            .portfolio_repository
            .find_by_id(&domain.portfolio_id)
            .await?
            .is_some_and(|p| p.is_published && p.user_id == domain.user_id);
        Ok(published.then_some(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[tokio::test]
    async fn lists_only_own_domains_newest_first() {
        let env = TestEnv::new().await;
        let older = env.register_existing("user-1", "first.dev").await;
        let newer = env.register_existing("user-1", "second.dev").await;
        env.register_existing("user-2", "other.dev").await;
        let service = UserDomainService::new(env.ctx.clone());

        let list = service.list_user_domains("user-1").await.unwrap_or_default();
        let ids: Vec<&str> = list.iter().map(|d| d.domain.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);
        assert!(list.iter().all(|d| d.mapping.is_some()));
    }

    #[tokio::test]
    async fn reassign_updates_domain_and_mapping() {
        let env = TestEnv::new().await;
        env.portfolios.insert("pf-2", "user-1", true).await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = UserDomainService::new(env.ctx.clone());

        let result = service.reassign_portfolio("user-1", &domain.id, "pf-2").await;
        assert!(matches!(result, Ok(ref d) if d.portfolio_id == "pf-2"));
        let mapping = env.domains.mapping_for(&domain.id).await;
        assert!(mapping.is_some_and(|m| m.portfolio_id == "pf-2"));
    }

    #[tokio::test]
    async fn reassign_requires_published_portfolio() {
        let env = TestEnv::new().await;
        env.portfolios.insert("pf-draft", "user-1", false).await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = UserDomainService::new(env.ctx.clone());

        let result = service
            .reassign_portfolio("user-1", &domain.id, "pf-draft")
            .await;
        assert!(matches!(result, Err(CoreError::PortfolioNotEligible(_))));
    }

    #[tokio::test]
    async fn reassign_inactive_domain_is_rejected() {
        let env = TestEnv::new().await;
        env.portfolios.insert("pf-2", "user-1", true).await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = UserDomainService::new(env.ctx.clone());
        let _ = service.deactivate_domain("user-1", &domain.id).await;

        let result = service.reassign_portfolio("user-1", &domain.id, "pf-2").await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));

        // 域名与映射保持一致的停用状态
        let mapping = env.domains.mapping_for(&domain.id).await;
        assert!(mapping.is_some_and(|m| !m.is_active && m.portfolio_id == "pf-1"));
    }

    #[tokio::test]
    async fn deactivate_keeps_row() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = UserDomainService::new(env.ctx.clone());

        let result = service.deactivate_domain("user-1", &domain.id).await;
        assert!(matches!(result, Ok(ref d) if !d.is_active));
        assert_eq!(env.domains.count().await, 1);
        let mapping = env.domains.mapping_for(&domain.id).await;
        assert!(mapping.is_some_and(|m| !m.is_active));
    }

    #[tokio::test]
    async fn deactivate_other_users_domain_is_not_found() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-2", "mysite.dev").await;
        let service = UserDomainService::new(env.ctx.clone());

        let result = service.deactivate_domain("user-1", &domain.id).await;
        assert!(matches!(result, Err(CoreError::DomainNotFound(_))));
    }

    #[tokio::test]
    async fn resolve_host_requires_verified_active_published() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = UserDomainService::new(env.ctx.clone());

        // 未验证
        assert!(matches!(service.resolve_host("mysite.dev").await, Ok(None)));

        let _ = env.ctx.user_domain_repository.mark_verified(&domain.id).await;
        assert!(matches!(
            service.resolve_host("MySite.dev.:443").await,
            Ok(Some(ref d)) if d.id == domain.id
        ));

        env.portfolios.insert("pf-1", "user-1", false).await;
        assert!(matches!(service.resolve_host("mysite.dev").await, Ok(None)));
    }
}
