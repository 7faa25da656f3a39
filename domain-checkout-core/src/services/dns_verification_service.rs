//! DNS 验证服务

use std::sync::Arc;

use super::ServiceContext;
use crate::error::{CoreError, CoreResult};
use crate::types::{
    DnsInstruction, DnsInstructions, DnsVerificationOutcome, UserDomain, VerificationState,
};

const PROPAGATION_HINT: &str =
    "DNS changes can take up to 24 hours to propagate. Check your records and try again later.";

/// Confirms a claimed domain points at the platform before activating it.
///
/// Verification is user-triggered only. A failed check leaves nothing behind.
pub struct DnsVerificationService {
    ctx: Arc<ServiceContext>,
}

impl DnsVerificationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Check DNS for a user's domain and mark it verified on success.
    ///
    /// # Errors
    /// * `DomainNotFound` - not the caller's domain
    /// * `ValidationError` - domain has been deactivated
    /// * `ProviderUnavailable` - resolver timed out or failed; nothing was changed
    pub async fn verify_domain(
        &self,
        user_id: &str,
        user_domain_id: &str,
    ) -> CoreResult<DnsVerificationOutcome> {
        let domain = self.active_domain(user_id, user_domain_id).await?;

        if domain.is_verified {
            return Ok(DnsVerificationOutcome {
                user_domain_id: domain.id,
                domain_name: domain.domain_name,
                state: VerificationState::Verified,
                observed_targets: Vec::new(),
                message: "Domain is already verified".to_string(),
            });
        }

        log::debug!("Verifying DNS for {} ({})", domain.domain_name, domain.id);
        let accepted = &self.ctx.settings.accepted_targets;
        let mut lookup = self.ctx.dns_resolver.lookup(&domain.domain_name).await?;

        // 顶级记录不匹配时再查 www，对应 dns_instructions 中的 CNAME www
        if !lookup.targets.iter().any(|t| accepted.accepts(t)) {
            let www = self
                .ctx
                .dns_resolver
                .lookup(&format!("www.{}", domain.domain_name))
                .await?;
            lookup.records_found |= www.records_found;
            for target in www.targets {
                if !lookup.targets.contains(&target) {
                    lookup.targets.push(target);
                }
            }
        }

        if lookup.targets.iter().any(|t| accepted.accepts(t)) {
            let updated = self
                .ctx
                .user_domain_repository
                .mark_verified(&domain.id)
                .await?;
            log::info!("Domain {} verified", updated.domain_name);
            return Ok(DnsVerificationOutcome {
                user_domain_id: updated.id,
                domain_name: updated.domain_name,
                state: VerificationState::Verified,
                observed_targets: lookup.targets,
                message: "Domain verified successfully".to_string(),
            });
        }

        let message = if lookup.records_found {
            format!(
                "{} does not point at the platform yet. {PROPAGATION_HINT}",
                domain.domain_name
            )
        } else {
            format!("No DNS records found for {}. {PROPAGATION_HINT}", domain.domain_name)
        };
        log::info!(
            "DNS not yet pointing for {}: observed {:?}",
            domain.domain_name,
            lookup.targets
        );
        Ok(DnsVerificationOutcome {
            user_domain_id: domain.id,
            domain_name: domain.domain_name,
            state: VerificationState::Unverified,
            observed_targets: lookup.targets,
            message,
        })
    }

    /// Records the owner should create so the domain points at the platform.
    pub async fn dns_instructions(
        &self,
        user_id: &str,
        user_domain_id: &str,
    ) -> CoreResult<DnsInstructions> {
        let domain = self.ctx.owned_domain(user_id, user_domain_id).await?;
        let accepted = &self.ctx.settings.accepted_targets;

        let records = accepted
            .addresses
            .iter()
            .map(|ip| DnsInstruction {
                record_type: if ip.contains(':') { "AAAA" } else { "A" }.to_string(),
                name: "@".to_string(),
                value: ip.clone(),
            })
            .chain(accepted.cnames.iter().map(|cname| DnsInstruction {
                record_type: "CNAME".to_string(),
                name: "www".to_string(),
                value: cname.clone(),
            }))
            .collect();

        Ok(DnsInstructions {
            domain_name: domain.domain_name,
            records,
            note: PROPAGATION_HINT.to_string(),
        })
    }

    async fn active_domain(&self, user_id: &str, user_domain_id: &str) -> CoreResult<UserDomain> {
        let domain = self.ctx.owned_domain(user_id, user_domain_id).await?;
        if !domain.is_active {
            return Err(CoreError::ValidationError(format!(
                "Domain {} is inactive",
                domain.domain_name
            )));
        }
        Ok(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;
    use crate::types::{DnsLookupOutcome, SslStatus};

    fn pointing(targets: &[&str]) -> DnsLookupOutcome {
        DnsLookupOutcome {
            records_found: !targets.is_empty(),
            targets: targets.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn matching_a_record_verifies() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        env.dns.respond("mysite.dev", pointing(&["76.76.19.19"])).await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(result, Ok(ref o) if o.state == VerificationState::Verified));

        let stored = env.domains.get(&domain.id).await;
        assert!(stored.is_some_and(|d| d.is_verified));
        let mapping = env.domains.mapping_for(&domain.id).await;
        assert!(mapping.is_some_and(|m| m.dns_configured && m.ssl_status == SslStatus::Active));
    }

    #[tokio::test]
    async fn matching_cname_with_trailing_dot_verifies() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        env.dns
            .respond("mysite.dev", pointing(&["CNAME.auragen.com."]))
            .await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(result, Ok(ref o) if o.state == VerificationState::Verified));
    }

    #[tokio::test]
    async fn records_elsewhere_stay_unverified() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        env.dns.respond("mysite.dev", pointing(&["203.0.113.9"])).await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(
            result,
            Ok(ref o) if o.state == VerificationState::Unverified
                && o.observed_targets == vec!["203.0.113.9".to_string()]
                && o.message.contains("24 hours")
        ));
        assert!(env.domains.get(&domain.id).await.is_some_and(|d| !d.is_verified));
    }

    #[tokio::test]
    async fn www_cname_verifies_when_apex_is_elsewhere() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        env.dns.respond("mysite.dev", pointing(&["203.0.113.9"])).await;
        env.dns
            .respond("www.mysite.dev", pointing(&["cname.auragen.com"]))
            .await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(
            result,
            Ok(ref o) if o.state == VerificationState::Verified
                && o.observed_targets.len() == 2
        ));
        assert_eq!(env.dns.lookup_count().await, 2);
        let mapping = env.domains.mapping_for(&domain.id).await;
        assert!(mapping.is_some_and(|m| m.dns_configured));
    }

    #[tokio::test]
    async fn no_records_stay_unverified() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(
            result,
            Ok(ref o) if o.state == VerificationState::Unverified && o.observed_targets.is_empty()
        ));
    }

    #[tokio::test]
    async fn resolver_outage_changes_nothing() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        env.dns.fail_with_timeout(true).await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(result, Err(CoreError::ProviderUnavailable(_))));
        assert!(env.domains.get(&domain.id).await.is_some_and(|d| !d.is_verified));
    }

    #[tokio::test]
    async fn already_verified_skips_lookup() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        env.dns.respond("mysite.dev", pointing(&["76.76.19.19"])).await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let _ = service.verify_domain("user-1", &domain.id).await;
        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(result, Ok(ref o) if o.state == VerificationState::Verified));
        assert_eq!(env.dns.lookup_count().await, 1);
    }

    #[tokio::test]
    async fn other_users_domain_is_not_found() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-2", "mysite.dev").await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(result, Err(CoreError::DomainNotFound(_))));
        assert_eq!(env.dns.lookup_count().await, 0);
    }

    #[tokio::test]
    async fn inactive_domain_is_rejected() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let _ = env.ctx.user_domain_repository.deactivate(&domain.id).await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.verify_domain("user-1", &domain.id).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[tokio::test]
    async fn instructions_list_accepted_targets() {
        let env = TestEnv::new().await;
        let domain = env.register_existing("user-1", "mysite.dev").await;
        let service = DnsVerificationService::new(env.ctx.clone());

        let result = service.dns_instructions("user-1", &domain.id).await;
        let Ok(instructions) = result else {
            unreachable!("expected instructions, got {result:?}");
        };
        assert_eq!(instructions.records.len(), 2);
        assert_eq!(instructions.records[0].record_type, "A");
        assert_eq!(instructions.records[0].value, "76.76.19.19");
        assert_eq!(instructions.records[1].record_type, "CNAME");
        assert_eq!(instructions.records[1].name, "www");
    }
}
