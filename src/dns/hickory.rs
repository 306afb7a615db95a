//! Async DNS resolver using hickory-dns.
//!
//! Fully async resolution with system DNS configuration auto-detection and
//! dual-stack (IPv4 + IPv6) lookups. Unlike `GaiResolver` it never parks a
//! blocking thread, so abandoning a lookup actually stops it.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    proto::{ProtoError, ProtoErrorKind},
    ResolveError, TokioResolver,
};
use std::{io, net::SocketAddr, sync::LazyLock};

/// Async DNS resolver backed by hickory-dns.
///
/// The resolver is lazily initialized on first use and shared across all
/// instances via a static `LazyLock`.
///
/// # Example
///
/// ```rust,ignore
/// use resolvenet::dns::{HickoryResolver, Name, Resolve};
///
/// let resolver = HickoryResolver::new();
/// let addrs = resolver.resolve(Name::new("example.com")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HickoryResolver {
    resolver: &'static LazyLock<TokioResolver>,
}

impl HickoryResolver {
    /// Creates a new `HickoryResolver`.
    ///
    /// The underlying resolver reads the system DNS configuration on first
    /// query; if that fails it falls back to hickory's defaults.
    pub fn new() -> Self {
        static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
            let mut builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };

            builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

            builder.build()
        });

        Self {
            resolver: &RESOLVER,
        }
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "resolving via hickory-dns");

            let lookup = resolver.resolver.lookup_ip(domain).await.map_err(|e| {
                tracing::debug!(domain = %domain, error = %e, "hickory-dns lookup failed");
                lookup_error(domain, &e)
            })?;

            let addrs: Vec<SocketAddr> = lookup.iter().map(|ip| SocketAddr::new(ip, 0)).collect();

            if addrs.is_empty() {
                return Err(NetError::dns_failed(
                    domain,
                    io::Error::new(io::ErrorKind::NotFound, "No addresses returned"),
                ));
            }

            tracing::debug!(domain = %domain, count = addrs.len(), "hickory-dns resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

/// Maps a hickory failure onto the `NetError` the prober classifies.
///
/// Hickory's own query timeout must surface as `TimedOut` so it reports the
/// same kind as the prober's per-attempt deadline.
fn lookup_error(domain: &str, err: &ResolveError) -> NetError {
    match err.proto().map(ProtoError::kind) {
        Some(ProtoErrorKind::Timeout) => NetError::TimedOut,
        Some(ProtoErrorKind::NoConnections) => NetError::InternetDisconnected,
        _ => NetError::dns_failed(domain, io::Error::new(io::ErrorKind::NotFound, err.to_string())),
    }
}
