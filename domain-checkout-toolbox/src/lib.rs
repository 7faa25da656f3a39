//! DNS lookup toolbox for the domain checkout workflow
//!
//! 提供无状态的 DNS 查询函数：A / AAAA / CNAME 以及组合的"指向"查询，
//! 供域名验证使用。所有功能独立于业务逻辑。

mod error;
mod services;
mod types;

pub use error::{ToolboxError, ToolboxResult};
pub use services::ToolboxService;
pub use types::{DnsLookupRecord, DnsLookupResult, DnsQueryType};
