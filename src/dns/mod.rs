//! DNS Resolution Module
//!
//! Provides pluggable name resolution with support for:
//! - System resolver (getaddrinfo via thread pool)
//! - Async hickory-dns resolver
//! - Hostname-to-IP override mechanism
//!
//! # Architecture
//!
//! This module mirrors Chromium's `HostResolver` concept. The `Resolve`
//! trait is the core abstraction that lets the prober run against the
//! system resolver, hickory-dns, or a test double interchangeably.
//!
//! # Example
//!
//! ```rust,ignore
//! use resolvenet::dns::{GaiResolver, Name, Resolve};
//!
//! let resolver = GaiResolver::new();
//! let addrs = resolver.resolve(Name::new("example.com")).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr.ip());
//! }
//! ```

mod gai;
mod hickory;
mod resolve;

pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use resolve::{Addrs, DnsResolverWithOverrides, Name, Resolve, Resolving};
