//! Core types for node IP selection.

use common::{Error, Result};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Pause between selection attempts when retrying.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// A virtual IP the node may need to route to.
///
/// IPv4-mapped IPv6 literals are held as plain IPv4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualIp(IpAddr);

impl VirtualIp {
    pub fn new(addr: IpAddr) -> Self {
        Self(addr.to_canonical())
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }
}

impl FromStr for VirtualIp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<IpAddr>()
            .map(Self::new)
            .map_err(|_| Error::invalid_argument(s))
    }
}

impl fmt::Display for VirtualIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The local address selected as the node's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenAddress(IpAddr);

impl ChosenAddress {
    pub fn new(addr: IpAddr) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }
}

impl fmt::Display for ChosenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether selection keeps retrying while no candidate exists.
///
/// Retries are unbounded and spaced by [`RETRY_INTERVAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    pub retry_on_failure: bool,
}

impl RetryPolicy {
    pub fn new(retry_on_failure: bool) -> Self {
        Self { retry_on_failure }
    }

    pub fn interval(&self) -> Duration {
        RETRY_INTERVAL
    }
}

/// Parse every argument as a VIP, failing on the first malformed one.
pub fn parse_vips<S: AsRef<str>>(args: &[S]) -> Result<Vec<VirtualIp>> {
    args.iter()
        .map(|arg| {
            let vip: VirtualIp = arg.as_ref().parse()?;
            info!(vip = %vip, "Parsed Virtual IP");
            Ok(vip)
        })
        .collect()
}
