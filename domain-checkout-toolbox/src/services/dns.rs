//! DNS 查询模块

use std::net::IpAddr;
use std::time::Duration;

use futures::future::join_all;
use hickory_resolver::{ResolveError, TokioResolver, proto::rr::RecordType};
use tokio::time::timeout;

use super::resolver::{DEFAULT_RESOLVER, SYSTEM_DNS_LABEL, build_resolver_for_ns};
use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{DnsLookupRecord, DnsLookupResult, DnsQueryType};

/// DNS 查询
///
/// "no records" and NXDOMAIN produce an empty record list, transport failures are errors.
/// The whole lookup (all record types) is bounded by `deadline`.
pub async fn dns_lookup(
    domain: &str,
    record_type: DnsQueryType,
    nameserver: Option<&str>,
    deadline: Duration,
) -> ToolboxResult<DnsLookupResult> {
    let custom;
    let (resolver, used_nameserver): (&TokioResolver, String) = match nameserver {
        Some(ns) if !ns.trim().is_empty() => {
            let ns_ip: IpAddr = ns.trim().parse().map_err(|_| {
                ToolboxError::ValidationError(format!("无效的 DNS 服务器地址: {ns}"))
            })?;
            custom = build_resolver_for_ns(ns_ip);
            (&custom, ns_ip.to_string())
        }
        _ => (&*DEFAULT_RESOLVER, SYSTEM_DNS_LABEL.clone()),
    };

    let types: &[RecordType] = match record_type {
        DnsQueryType::A => &[RecordType::A],
        DnsQueryType::Aaaa => &[RecordType::AAAA],
        DnsQueryType::Cname => &[RecordType::CNAME],
        DnsQueryType::Txt => &[RecordType::TXT],
        DnsQueryType::Pointing => &[RecordType::A, RecordType::AAAA, RecordType::CNAME],
    };

    let lookups = join_all(types.iter().map(|t| lookup_one(resolver, domain, *t)));
    let results = timeout(deadline, lookups).await.map_err(|_| {
        log::warn!("DNS lookup for {domain} ({record_type}) timed out after {deadline:?}");
        ToolboxError::Timeout(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX))
    })?;

    let mut records = Vec::new();
    for result in results {
        records.extend(result?);
    }

    log::debug!(
        "DNS lookup {domain} ({record_type}) via {used_nameserver}: {} record(s)",
        records.len()
    );

    Ok(DnsLookupResult {
        nameserver: used_nameserver,
        records,
    })
}

async fn lookup_one(
    resolver: &TokioResolver,
    domain: &str,
    record_type: RecordType,
) -> ToolboxResult<Vec<DnsLookupRecord>> {
    let response = match resolver.lookup(domain, record_type).await {
        Ok(response) => response,
        Err(e) if is_empty_answer(&e) => return Ok(Vec::new()),
        Err(e) => {
            return Err(ToolboxError::NetworkError(format!(
                "{record_type} lookup for {domain} failed: {e}"
            )));
        }
    };

    let mut records = Vec::new();
    for record in response.record_iter() {
        // Resolvers include the CNAME chain in A/AAAA answers, keep only what was asked for.
        if record.record_type() != record_type {
            continue;
        }
        let data = record.data();
        let value = if let Some(ip) = data.as_a() {
            ip.0.to_string()
        } else if let Some(ip) = data.as_aaaa() {
            ip.0.to_string()
        } else if let Some(cname) = data.as_cname() {
            cname.0.to_string().trim_end_matches('.').to_string()
        } else if let Some(txt) = data.as_txt() {
            txt.iter()
                .map(|part| String::from_utf8_lossy(part).to_string())
                .collect::<String>()
        } else {
            log::warn!("Unexpected RData type in {record_type} query: {data:?}");
            continue;
        };
        records.push(DnsLookupRecord {
            record_type: record_type.to_string(),
            name: domain.to_string(),
            value,
            ttl: record.ttl(),
        });
    }
    Ok(records)
}

fn is_empty_answer(e: &ResolveError) -> bool {
    e.is_no_records_found() || e.is_nx_domain()
}
