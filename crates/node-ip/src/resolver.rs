//! Seams between node IP selection and the host.

use common::Result;
use routing::{AddressFilter, Interface, Topology};
use std::net::IpAddr;
use std::time::Duration;

/// Source of candidate node addresses.
///
/// Implementations return candidates most-preferred first; callers take the
/// first entry as-is. An empty list means "none yet" and is not an error.
pub trait AddressResolver {
    /// Local addresses with a route toward at least one of `targets`.
    fn addresses_routing_to(&self, targets: &[IpAddr], filter: AddressFilter)
    -> Result<Vec<IpAddr>>;

    /// Local addresses on links carrying a default route.
    fn addresses_on_default_route(&self, filter: AddressFilter) -> Result<Vec<IpAddr>>;
}

/// Maps a VIP to the local interface that would carry its traffic.
pub trait InterfaceLocator {
    /// Returns an interface with index 0 when no interface matches.
    fn suitable_interface(&self, vip: IpAddr) -> Result<Interface>;
}

/// Blocking delay used between retries.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Resolver backed by live rtnetlink dumps.
///
/// Every call takes a fresh snapshot. Ordering follows [`Topology`]: links by
/// ascending index for VIP-routed addresses, default routes by ascending
/// metric, addresses in kernel order within a link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetlinkResolver;

impl AddressResolver for NetlinkResolver {
    fn addresses_routing_to(
        &self,
        targets: &[IpAddr],
        filter: AddressFilter,
    ) -> Result<Vec<IpAddr>> {
        Ok(Topology::capture()?.addresses_routing(targets, filter))
    }

    fn addresses_on_default_route(&self, filter: AddressFilter) -> Result<Vec<IpAddr>> {
        Ok(Topology::capture()?.addresses_default(filter))
    }
}

impl InterfaceLocator for NetlinkResolver {
    fn suitable_interface(&self, vip: IpAddr) -> Result<Interface> {
        Ok(Topology::capture()?.suitable_interface(vip))
    }
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
