//! 工具函数

pub mod datetime;
pub mod domain_name;

pub use domain_name::{ParsedDomain, normalize_tld, parse_domain};
