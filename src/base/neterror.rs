use std::{io, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Generic Errors
    #[error("Invalid argument")]
    InvalidArgument,
    #[error("Operation timed out")]
    TimedOut,

    // Resolution Errors
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Could not resolve {domain}: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Address invalid")]
    AddressInvalid,
    #[error("Internet disconnected")]
    InternetDisconnected,

    #[error("Unknown error code: {0}")]
    Unknown(i32),
}

impl NetError {
    /// Wraps an IO failure from a lookup of `domain`.
    pub fn dns_failed(domain: impl Into<String>, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.into(),
            source: Arc::new(source),
        }
    }

    /// Returns true for errors that mean the name has no usable address.
    pub fn is_name_not_resolved(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolved | NetError::NameNotResolvedFor { .. }
        )
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::InvalidArgument => -4,
            NetError::TimedOut => -7,
            NetError::NameNotResolved => -105,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::InternetDisconnected => -106,
            NetError::AddressInvalid => -108,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -4 => NetError::InvalidArgument,
            -7 => NetError::TimedOut,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -108 => NetError::AddressInvalid,
            _ => NetError::Unknown(code),
        }
    }
}
