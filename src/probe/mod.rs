//! Bulk resolution probing.
//!
//! Takes an ordered list of domain names, resolves each one through a
//! [`Resolve`](crate::dns::Resolve) implementation and yields one
//! [`ResolutionResult`] per input:
//!
//! - at most `concurrency` lookups in flight at once
//! - per-lookup timeout, optional retries
//! - results in input order or in completion order
//! - cancellable through a [`ProbeHandle`]
//!
//! Per-domain failures are reported as data, never as errors.

pub mod input;
mod options;
mod prober;
mod result;
mod validate;

pub use options::{AddressSelection, ProbeOptions};
pub use prober::{Probe, ProbeHandle, Prober};
pub use result::{ErrorKind, Outcome, ResolutionResult, ResolutionStatus};
pub use validate::validate_host;
