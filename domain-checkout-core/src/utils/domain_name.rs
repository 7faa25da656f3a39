//! 域名规范化与校验

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// Longest label allowed in front of the TLD.
pub const MAX_LABEL_LEN: usize = 63;

static LABEL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").ok());

/// Lowercase TLD with exactly one leading dot (`DEV` → `.dev`).
#[must_use]
pub fn normalize_tld(tld: &str) -> String {
    let tld = tld.trim().trim_start_matches('.').to_ascii_lowercase();
    format!(".{tld}")
}

/// Whether `label` is a valid single label (`mysite`, `my-site`, `a1`).
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    LABEL_RE.as_ref().is_some_and(|re| re.is_match(label))
}

/// A normalized full domain split into its label and TLD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDomain {
    /// Lowercase full name, e.g. `mysite.dev`.
    pub full: String,
    pub label: String,
    /// Lowercase TLD with leading dot.
    pub tld: String,
}

/// Validate `domain_name` against the requested `tld`.
///
/// The name must be exactly one valid label followed by the TLD. Comparison is
/// case-insensitive, the result is lowercase.
pub fn parse_domain(domain_name: &str, tld: &str) -> CoreResult<ParsedDomain> {
    let tld = normalize_tld(tld);
    if tld.len() < 2 {
        return Err(CoreError::InvalidDomainName(format!(
            "'{domain_name}': empty TLD"
        )));
    }
    let full = domain_name.trim().trim_end_matches('.').to_ascii_lowercase();

    let label = full
        .strip_suffix(tld.as_str())
        .ok_or_else(|| CoreError::InvalidDomainName(format!("'{full}' does not end with {tld}")))?;

    if !is_valid_label(label) {
        return Err(CoreError::InvalidDomainName(format!(
            "'{full}': label must be 1-{MAX_LABEL_LEN} characters of a-z, 0-9 or '-', not starting or ending with '-'"
        )));
    }

    Ok(ParsedDomain {
        label: label.to_string(),
        full,
        tld,
    })
}
