//! Route-table queries over a captured snapshot.

use common::Result;
use std::net::IpAddr;
use tracing::{debug, trace};

use crate::filter::AddressFilter;
use crate::netlink::NetlinkSocket;
use crate::types::{Address, Family, Interface, Link, MAIN_TABLE, Route, RouteKind};

/// Links, addresses and routes as seen at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub links: Vec<Link>,
    pub addresses: Vec<Address>,
    pub routes: Vec<Route>,
}

fn push_unique(list: &mut Vec<IpAddr>, ip: IpAddr) {
    if !list.contains(&ip) {
        list.push(ip);
    }
}

impl Topology {
    pub fn new(links: Vec<Link>, addresses: Vec<Address>, routes: Vec<Route>) -> Self {
        Self {
            links,
            addresses,
            routes,
        }
    }

    /// Dump the current kernel state over a fresh rtnetlink socket.
    pub fn capture() -> Result<Self> {
        let mut socket = NetlinkSocket::new()?;
        let topology = Self {
            links: socket.links()?,
            addresses: socket.addresses()?,
            routes: socket.routes()?,
        };
        debug!(
            links = topology.links.len(),
            addresses = topology.addresses.len(),
            routes = topology.routes.len(),
            "Captured routing state"
        );
        Ok(topology)
    }

    /// Non-loopback links in ascending index order.
    fn candidate_links(&self) -> Vec<&Link> {
        let mut links: Vec<&Link> = self.links.iter().filter(|link| !link.loopback).collect();
        links.sort_by_key(|link| link.index);
        links
    }

    fn is_loopback(&self, index: u32) -> bool {
        self.links
            .iter()
            .any(|link| link.index == index && link.loopback)
    }

    fn addresses_on(&self, index: u32) -> impl Iterator<Item = &Address> {
        self.addresses
            .iter()
            .filter(move |addr| addr.link_index == index)
    }

    /// Local addresses with a direct route toward at least one of `vips`.
    ///
    /// Links are visited in ascending index order and addresses in kernel
    /// order. An address matches when its subnet contains a VIP or, for a /32
    /// or /128 address, when a main-table route via the same link covers a
    /// VIP. The VIPs themselves are never returned.
    pub fn addresses_routing(&self, vips: &[IpAddr], filter: AddressFilter) -> Vec<IpAddr> {
        let vips: Vec<IpAddr> = vips.iter().map(IpAddr::to_canonical).collect();
        let mut matches = Vec::new();

        for link in self.candidate_links() {
            for address in self.addresses_on(link.index) {
                if !filter(address) || vips.contains(&address.address) {
                    continue;
                }

                let routed = if address.is_host() {
                    self.routes
                        .iter()
                        .filter(|route| {
                            route.output_link == Some(link.index)
                                && route.table == MAIN_TABLE
                                && !route.is_default()
                        })
                        .any(|route| vips.iter().any(|vip| route.contains(*vip)))
                } else {
                    vips.iter().any(|vip| address.contains(*vip))
                };

                if routed {
                    trace!(address = %address, link = %link.name, "Address routes to VIP");
                    push_unique(&mut matches, address.address);
                }
            }
        }

        matches
    }

    /// Local addresses on links carrying a default route.
    ///
    /// Default routes are taken in ascending metric order; for each, the
    /// addresses of the same family on its output link are returned in kernel
    /// order.
    pub fn addresses_default(&self, filter: AddressFilter) -> Vec<IpAddr> {
        let mut defaults: Vec<&Route> = self
            .routes
            .iter()
            .filter(|route| {
                route.is_default() && route.table == MAIN_TABLE && route.kind == RouteKind::Unicast
            })
            .collect();
        defaults.sort_by_key(|route| route.priority);

        let mut matches = Vec::new();
        for route in defaults {
            let Some(index) = route.output_link else {
                continue;
            };
            if self.is_loopback(index) {
                continue;
            }
            trace!(route = %route, "Considering default route");
            for address in self.addresses_on(index) {
                if Family::of(&address.address) == route.family && filter(address) {
                    push_unique(&mut matches, address.address);
                }
            }
        }

        matches
    }

    /// The first non-loopback link holding an address whose subnet contains
    /// `vip`, or `Interface::default()` (index 0) when there is none.
    pub fn suitable_interface(&self, vip: IpAddr) -> Interface {
        let vip = vip.to_canonical();
        self.candidate_links()
            .into_iter()
            .find(|link| self.addresses_on(link.index).any(|addr| addr.contains(vip)))
            .map(Interface::from)
            .unwrap_or_default()
    }
}
