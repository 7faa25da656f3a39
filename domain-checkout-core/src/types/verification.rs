//! DNS 验证类型定义

use serde::{Deserialize, Serialize};

/// Verification state of a user domain.
///
/// `Pending` only exists while a lookup is in flight, it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    Unverified,
    Pending,
    Verified,
}

/// What a resolver saw for a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsLookupOutcome {
    pub records_found: bool,
    /// A/AAAA addresses and CNAME targets, as returned.
    pub targets: Vec<String>,
}

/// DNS targets that count as "pointing at the platform".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedTargets {
    /// Platform IP addresses for apex A/AAAA records.
    pub addresses: Vec<String>,
    /// Platform hostnames for CNAME records.
    pub cnames: Vec<String>,
}

impl Default for AcceptedTargets {
    fn default() -> Self {
        Self {
            addresses: vec!["76.76.19.19".to_string()],
            cnames: vec!["cname.auragen.com".to_string()],
        }
    }
}

impl AcceptedTargets {
    /// Whether an observed target is one of the accepted ones.
    ///
    /// Comparison ignores ASCII case and a trailing root dot.
    #[must_use]
    pub fn accepts(&self, observed: &str) -> bool {
        let observed = normalize_target(observed);
        self.addresses
            .iter()
            .chain(&self.cnames)
            .any(|t| normalize_target(t) == observed)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.cnames.is_empty()
    }
}

fn normalize_target(s: &str) -> String {
    s.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Result of a user-triggered DNS verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsVerificationOutcome {
    pub user_domain_id: String,
    pub domain_name: String,
    pub state: VerificationState,
    /// Targets observed during this check (empty when skipped or nothing found).
    pub observed_targets: Vec<String>,
    pub message: String,
}

/// One DNS record the owner must create at their registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsInstruction {
    pub record_type: String,
    /// `@` for the apex, otherwise the relative name.
    pub name: String,
    pub value: String,
}

/// DNS setup instructions for a claimed domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsInstructions {
    pub domain_name: String,
    pub records: Vec<DnsInstruction>,
    /// Propagation note shown to the user.
    pub note: String,
}
