//! # resolvenet
//!
//! Concurrent, fault-tolerant bulk domain resolution probing.
//!
//! `resolvenet` checks whether a list of domain names resolves, reporting
//! one result per name: the address it resolves to, or why it does not.
//! Lookups go through a pluggable resolver (the system's `getaddrinfo` or
//! hickory-dns) with bounded concurrency, per-query timeouts and
//! cancellation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use resolvenet::dns::GaiResolver;
//! use resolvenet::probe::Prober;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let prober = Prober::new(Arc::new(GaiResolver::new()));
//!     let mut results = prober.probe(["example.com", "nope.invalid"]).unwrap();
//!     while let Some(result) = results.next().await {
//!         println!("{result}");
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and context helpers
//! - [`dns`] - The `Resolve` trait and resolver implementations
//! - [`probe`] - The resolution prober, its options and result records

pub mod base;
pub mod dns;
pub mod probe;
