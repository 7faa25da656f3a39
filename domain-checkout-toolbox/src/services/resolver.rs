//! Shared DNS resolver helpers used across service modules.

use std::net::IpAddr;
use std::sync::LazyLock;
use std::time::Duration;

use hickory_resolver::{
    TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};

/// Per-attempt timeout applied inside the resolver. The caller wraps the whole lookup
/// in its own deadline as well.
const RESOLVER_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared default DNS resolver.
///
/// On Unix/Windows this uses the host system configuration (e.g. `/etc/resolv.conf`).
/// If the system configuration cannot be loaded, it falls back to Hickory's default
/// upstream set (Google Public DNS).
pub(crate) static DEFAULT_RESOLVER: LazyLock<TokioResolver> =
    LazyLock::new(build_system_resolver);

/// Human-readable description of the DNS servers used by the default resolver.
pub(crate) static SYSTEM_DNS_LABEL: LazyLock<String> = LazyLock::new(|| {
    #[cfg(any(unix, target_os = "windows"))]
    {
        if let Ok((config, _opts)) = hickory_resolver::system_conf::read_system_conf() {
            let ips = dedup_ips(&config);
            if !ips.is_empty() {
                return ips.join(", ");
            }
        }
    }

    let ips = dedup_ips(&ResolverConfig::default());
    if ips.is_empty() {
        "Default".to_string()
    } else {
        ips.join(", ")
    }
});

/// Deduplicate nameserver IP addresses from a resolver configuration.
pub(crate) fn dedup_ips(config: &ResolverConfig) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();
    for ns in config.name_servers() {
        let ip = ns.socket_addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips
}

fn resolver_opts() -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = RESOLVER_ATTEMPT_TIMEOUT;
    // Verification must observe fresh answers after the customer edits their zone.
    opts.cache_size = 0;
    opts
}

/// Build a resolver that targets a specific nameserver IP.
pub(crate) fn build_resolver_for_ns(ns_ip: IpAddr) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[ns_ip], 53, true),
    );
    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(resolver_opts())
        .build()
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver() -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(mut builder) => {
                *builder.options_mut() = resolver_opts();
                return builder.build();
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    TokioResolver::builder_with_config(
        ResolverConfig::default(),
        TokioConnectionProvider::default(),
    )
    .with_options(resolver_opts())
    .build()
}
