//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native name resolution via
//! `getaddrinfo`, executed on the blocking thread pool to avoid stalling the
//! async runtime. It honors /etc/hosts, nsswitch and resolv.conf exactly as
//! any other program on the host would.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::{context::IoResultExt, neterror::NetError};
use std::{io, net::ToSocketAddrs, sync::Arc};

/// System DNS resolver using `getaddrinfo` in a thread pool.
///
/// Each resolution spawns a blocking task. Dropping the returned future
/// abandons the lookup; the blocking call itself runs to completion and its
/// answer is discarded.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();
            let domain = host.clone();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Vec<_>>())
            })
            .await;

            // Handle task join error (cancellation, panic)
            let addrs = result
                .map_err(|e| {
                    tracing::error!(error = %e, "DNS resolution task failed");
                    NetError::NameNotResolved
                })?
                .dns_context(&domain)
                .inspect_err(|e| {
                    tracing::debug!(domain = %domain, error = %e, "DNS resolution failed");
                })?;

            if addrs.is_empty() {
                return Err(NetError::NameNotResolvedFor {
                    domain,
                    source: Arc::new(io::Error::new(
                        io::ErrorKind::NotFound,
                        "No addresses returned by getaddrinfo",
                    )),
                });
            }

            tracing::debug!(domain = %domain, count = addrs.len(), "DNS resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
