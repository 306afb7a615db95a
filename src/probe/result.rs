//! Per-domain result records.

use crate::base::neterror::NetError;
use serde::Serialize;
use std::{fmt, net::IpAddr};

/// Why a domain failed to produce an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The resolver answered that the name does not resolve.
    NameResolutionFailure,
    /// No answer arrived before the per-query timeout.
    Timeout,
    /// The name was rejected before any lookup was attempted.
    InvalidInput,
}

impl ErrorKind {
    /// Maps a resolver error onto the reported failure kind.
    pub fn classify(err: &NetError) -> Self {
        match err {
            NetError::TimedOut => ErrorKind::Timeout,
            NetError::InvalidArgument | NetError::AddressInvalid => ErrorKind::InvalidInput,
            _ => ErrorKind::NameResolutionFailure,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NameResolutionFailure => "name resolution failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InvalidInput => "invalid input",
        };
        f.write_str(s)
    }
}

impl From<&NetError> for ErrorKind {
    fn from(err: &NetError) -> Self {
        ErrorKind::classify(err)
    }
}

/// Coarse status of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionStatus {
    Resolved,
    Failed,
}

/// Terminal outcome of probing one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum Outcome {
    Resolved {
        address: IpAddr,
    },
    Failed {
        #[serde(rename = "error_kind")]
        kind: ErrorKind,
        reason: String,
    },
}

/// The record emitted for one input domain.
///
/// Created once the attempt(s) for its domain terminate and never changed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// The input string, verbatim.
    pub domain: String,
    /// Position of the domain in the probe input.
    pub index: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Lookups issued for this domain; zero when rejected up front.
    pub attempts: u32,
}

impl ResolutionResult {
    pub(crate) fn resolved(domain: String, index: usize, address: IpAddr, attempts: u32) -> Self {
        Self {
            domain,
            index,
            outcome: Outcome::Resolved { address },
            attempts,
        }
    }

    pub(crate) fn failed(
        domain: String,
        index: usize,
        kind: ErrorKind,
        reason: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            domain,
            index,
            outcome: Outcome::Failed {
                kind,
                reason: reason.into(),
            },
            attempts,
        }
    }

    pub fn status(&self) -> ResolutionStatus {
        match self.outcome {
            Outcome::Resolved { .. } => ResolutionStatus::Resolved,
            Outcome::Failed { .. } => ResolutionStatus::Failed,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status() == ResolutionStatus::Resolved
    }

    /// The reported address, present only for resolved results.
    pub fn address(&self) -> Option<IpAddr> {
        match self.outcome {
            Outcome::Resolved { address } => Some(address),
            Outcome::Failed { .. } => None,
        }
    }

    /// The failure kind, present only for failed results.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.outcome {
            Outcome::Resolved { .. } => None,
            Outcome::Failed { kind, .. } => Some(kind),
        }
    }

    /// Human readable failure detail.
    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Resolved { .. } => None,
            Outcome::Failed { reason, .. } => Some(reason),
        }
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Resolved { address } => write!(f, "{} resolves to {}", self.domain, address),
            Outcome::Failed { .. } => write!(f, "{} does not resolve", self.domain),
        }
    }
}
