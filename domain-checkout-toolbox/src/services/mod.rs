//! Stateless service façade exposing the toolbox operations.

mod dns;
mod resolver;

use std::time::Duration;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{DnsLookupResult, DnsQueryType};

/// Validate and normalise a domain name input.
///
/// Trims whitespace and a trailing root dot, lowercases, and rejects empty or
/// overlong inputs as well as IP literals.
fn validate_domain(domain: &str) -> ToolboxResult<String> {
    let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return Err(ToolboxError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    if domain.parse::<std::net::IpAddr>().is_ok() {
        return Err(ToolboxError::ValidationError(format!(
            "Expected a domain name, got an IP address: {domain}"
        )));
    }
    if domain.len() > 253 {
        return Err(ToolboxError::ValidationError(format!(
            "Domain name exceeds maximum length of 253 characters (got {})",
            domain.len()
        )));
    }
    if domain
        .split('.')
        .any(|label| label.is_empty() || label.len() > 63)
    {
        return Err(ToolboxError::ValidationError(format!(
            "Invalid domain name: {domain}"
        )));
    }
    Ok(domain)
}

/// Entry point for the DNS operations.
///
/// All methods are stateless associated functions.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use domain_checkout_toolbox::{DnsQueryType, ToolboxService};
/// # async fn demo() -> domain_checkout_toolbox::ToolboxResult<()> {
/// let dns = ToolboxService::dns_lookup("example.com", DnsQueryType::Pointing, None, Duration::from_secs(5)).await?;
/// # Ok(())
/// # }
/// ```
pub struct ToolboxService;

impl ToolboxService {
    /// Resolve DNS records for a domain.
    ///
    /// Pass `None` for `nameserver` to use the system default resolver. The lookup
    /// fails with [`ToolboxError::Timeout`] once `deadline` elapses.
    pub async fn dns_lookup(
        domain: &str,
        record_type: DnsQueryType,
        nameserver: Option<&str>,
        deadline: Duration,
    ) -> ToolboxResult<DnsLookupResult> {
        let domain = validate_domain(domain)?;
        dns::dns_lookup(&domain, record_type, nameserver, deadline).await
    }
}
