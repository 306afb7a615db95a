//! Probe configuration.

use serde::{Deserialize, Serialize};
use std::{net::IpAddr, time::Duration};

/// Which of the returned addresses a resolved result reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSelection {
    /// The first address the resolver returned, of either family.
    #[default]
    First,
    /// The first IPv4 address, falling back to the first address overall.
    PreferIpv4,
    /// The first IPv6 address, falling back to the first address overall.
    PreferIpv6,
    /// The first IPv4 address. A name with only IPv6 addresses does not
    /// resolve, as with an IPv4-only `gethostbyname` lookup.
    Ipv4Only,
}

impl AddressSelection {
    /// Picks one address out of a resolver answer.
    ///
    /// Returns `None` when `addrs` is empty, or for `Ipv4Only` when it holds
    /// no IPv4 address.
    pub fn select<I>(self, addrs: I) -> Option<IpAddr>
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let mut addrs = addrs.into_iter();
        let wanted: fn(&IpAddr) -> bool = match self {
            AddressSelection::First => return addrs.next(),
            AddressSelection::Ipv4Only => return addrs.find(IpAddr::is_ipv4),
            AddressSelection::PreferIpv4 => IpAddr::is_ipv4,
            AddressSelection::PreferIpv6 => IpAddr::is_ipv6,
        };
        let first = addrs.next()?;
        if wanted(&first) {
            return Some(first);
        }
        Some(addrs.find(|a| wanted(a)).unwrap_or(first))
    }
}

/// Options controlling a probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOptions {
    /// Maximum number of resolution attempts in flight at once
    pub concurrency: usize,
    /// Per-attempt timeout, `None` waits as long as the resolver takes
    pub timeout: Option<Duration>,
    /// Emit results in input order instead of completion order
    pub ordered_output: bool,
    /// Extra attempts after a failed one
    pub max_retries: u32,
    /// Reject malformed names before resolving them
    pub validate_names: bool,
    /// Which answer address to report
    pub address_selection: AddressSelection,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout: Some(Duration::from_secs(5)),
            ordered_output: true,
            max_retries: 0,
            validate_names: false,
            address_selection: AddressSelection::First,
        }
    }
}

impl ProbeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// One lookup at a time with no timeout, in input order, reporting only
    /// IPv4 addresses. This is what a plain loop over blocking
    /// `gethostbyname` calls prints.
    pub fn sequential() -> Self {
        Self {
            concurrency: 1,
            timeout: None,
            address_selection: AddressSelection::Ipv4Only,
            ..Self::default()
        }
    }

    /// Set the concurrency bound. Zero is rejected when the probe starts.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the per-attempt timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Choose between input order and completion order.
    pub fn ordered_output(mut self, ordered: bool) -> Self {
        self.ordered_output = ordered;
        self
    }

    /// Set the number of retries after a failed attempt.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Enable or disable host name validation.
    pub fn validate_names(mut self, validate: bool) -> Self {
        self.validate_names = validate;
        self
    }

    /// Set the address selection policy.
    pub fn address_selection(mut self, selection: AddressSelection) -> Self {
        self.address_selection = selection;
        self
    }
}
