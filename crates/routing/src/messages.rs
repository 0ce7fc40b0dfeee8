//! Conversion of rtnetlink dump replies into topology records.

use netlink_packet_route::AddressFamily;
use netlink_packet_route::address::{AddressAttribute, AddressMessage};
use netlink_packet_route::link::{LinkAttribute, LinkMessage};
use netlink_packet_route::route::{RouteAddress, RouteAttribute, RouteMessage, RouteType};
use std::net::IpAddr;

use crate::types::{Address, Family, Link, Route, RouteKind};

/// Convert an `RTM_NEWLINK` reply.
pub(crate) fn link_from_message(msg: &LinkMessage) -> Link {
    let name = msg
        .attributes
        .iter()
        .find_map(|attr| match attr {
            LinkAttribute::IfName(name) => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_default();
    let flags = msg.header.flags.bits();

    Link {
        index: msg.header.index,
        name,
        loopback: flags & libc::IFF_LOOPBACK as u32 != 0,
    }
}

/// Convert an `RTM_NEWADDR` reply. Replies without an address attribute are dropped.
pub(crate) fn address_from_message(msg: &AddressMessage) -> Option<Address> {
    let mut local = None;
    let mut peer = None;
    // IFA_FLAGS supersedes the 8-bit header flags when present.
    let mut flags = u32::from(msg.header.flags.bits());

    for attr in &msg.attributes {
        match attr {
            AddressAttribute::Local(ip) => local = Some(*ip),
            AddressAttribute::Address(ip) => peer = Some(*ip),
            AddressAttribute::Flags(f) => flags = f.bits(),
            _ => {}
        }
    }

    // On point-to-point links IFA_ADDRESS is the remote end and IFA_LOCAL ours.
    let address = local.or(peer)?;

    Some(Address {
        link_index: msg.header.index,
        address,
        prefix_len: msg.header.prefix_len,
        flags,
    })
}

fn route_ip(addr: &RouteAddress) -> Option<IpAddr> {
    match addr {
        RouteAddress::Inet(v4) => Some(IpAddr::V4(*v4)),
        RouteAddress::Inet6(v6) => Some(IpAddr::V6(*v6)),
        _ => None,
    }
}

/// Convert an `RTM_NEWROUTE` reply into one route per next hop.
pub(crate) fn routes_from_message(msg: &RouteMessage) -> Vec<Route> {
    let family = match msg.header.address_family {
        AddressFamily::Inet => Family::V4,
        AddressFamily::Inet6 => Family::V6,
        _ => return Vec::new(),
    };
    let kind = match msg.header.kind {
        RouteType::Unicast => RouteKind::Unicast,
        RouteType::Local => RouteKind::Local,
        _ => RouteKind::Other,
    };

    let mut base = Route {
        family,
        destination: None,
        prefix_len: msg.header.destination_prefix_length,
        output_link: None,
        gateway: None,
        priority: 0,
        table: u32::from(msg.header.table),
        kind,
    };
    let mut hops = Vec::new();

    for attr in &msg.attributes {
        match attr {
            RouteAttribute::Destination(dst) => base.destination = route_ip(dst),
            RouteAttribute::Oif(index) => base.output_link = Some(*index),
            RouteAttribute::Gateway(gw) => base.gateway = route_ip(gw),
            RouteAttribute::Priority(priority) => base.priority = *priority,
            RouteAttribute::Table(table) => base.table = *table,
            RouteAttribute::MultiPath(next_hops) => {
                for hop in next_hops {
                    let gateway = hop.attributes.iter().find_map(|attr| match attr {
                        RouteAttribute::Gateway(gw) => route_ip(gw),
                        _ => None,
                    });
                    hops.push((hop.interface_index, gateway));
                }
            }
            _ => {}
        }
    }

    if hops.is_empty() {
        return vec![base];
    }

    hops.into_iter()
        .map(|(index, gateway)| Route {
            output_link: Some(index),
            gateway: gateway.or(base.gateway),
            ..base.clone()
        })
        .collect()
}
