//! Toolbox data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// DNS record types supported by the lookup helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsQueryType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Text record.
    Txt,
    /// A, AAAA and CNAME together.
    Pointing,
}

impl fmt::Display for DnsQueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
            Self::Cname => write!(f, "CNAME"),
            Self::Txt => write!(f, "TXT"),
            Self::Pointing => write!(f, "POINTING"),
        }
    }
}

impl FromStr for DnsQueryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "TXT" => Ok(Self::Txt),
            "POINTING" => Ok(Self::Pointing),
            _ => Err(format!("Unsupported DNS query type: {s}")),
        }
    }
}

/// A single DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsLookupRecord {
    /// Record type (`"A"`, `"AAAA"`, `"CNAME"`, `"TXT"`).
    pub record_type: String,
    /// Record name (owner).
    pub name: String,
    /// Record value. CNAME targets have their trailing dot removed.
    pub value: String,
    /// Time-to-live in seconds.
    pub ttl: u32,
}

/// Result of a DNS lookup, including the nameserver that answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsLookupResult {
    /// DNS resolver used for this query.
    ///
    /// A custom nameserver IP when one was given, otherwise a best-effort label for
    /// the system DNS configuration.
    pub nameserver: String,
    /// Returned records. Empty when the name has no records of the queried types.
    pub records: Vec<DnsLookupRecord>,
}

impl DnsLookupResult {
    /// Values of all records of the given type.
    pub fn values_of<'a>(&'a self, record_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.records
            .iter()
            .filter(move |r| r.record_type.eq_ignore_ascii_case(record_type))
            .map(|r| r.value.as_str())
    }
}
