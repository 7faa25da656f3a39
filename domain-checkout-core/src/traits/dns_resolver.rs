//! DNS 解析抽象 Trait

use std::time::Duration;

use async_trait::async_trait;
use domain_checkout_toolbox::{DnsQueryType, ToolboxError, ToolboxService};

use crate::error::{CoreError, CoreResult};
use crate::types::DnsLookupOutcome;

/// Resolves where a name points.
///
/// Implementations must bound every lookup in time and report timeouts or resolver
/// failures as `ProviderUnavailable`. "No records" is a successful, empty outcome.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn lookup(&self, domain: &str) -> CoreResult<DnsLookupOutcome>;
}

/// Resolver backed by the toolbox (hickory) crate.
#[derive(Debug, Clone)]
pub struct SystemDnsResolver {
    /// Custom nameserver IP, `None` for the system configuration.
    nameserver: Option<String>,
    timeout: Duration,
}

impl SystemDnsResolver {
    #[must_use]
    pub fn new(nameserver: Option<String>, timeout: Duration) -> Self {
        Self {
            nameserver,
            timeout,
        }
    }
}

#[async_trait]
impl DnsResolver for SystemDnsResolver {
    async fn lookup(&self, domain: &str) -> CoreResult<DnsLookupOutcome> {
        let result = ToolboxService::dns_lookup(
            domain,
            DnsQueryType::Pointing,
            self.nameserver.as_deref(),
            self.timeout,
        )
        .await
        .map_err(|e| match e {
            ToolboxError::ValidationError(msg) => CoreError::ValidationError(msg),
            transient => CoreError::ProviderUnavailable(format!("DNS lookup for {domain}: {transient}")),
        })?;

        let targets: Vec<String> = result.records.into_iter().map(|r| r.value).collect();
        Ok(DnsLookupOutcome {
            records_found: !targets.is_empty(),
            targets,
        })
    }
}
