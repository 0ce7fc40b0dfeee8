//! Link, address and route records captured from the kernel.

use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

/// Main routing table id (`RT_TABLE_MAIN`).
pub const MAIN_TABLE: u32 = 254;

/// Address flags (`IFA_F_*`).
pub const IFA_F_TEMPORARY: u32 = 0x01;
pub const IFA_F_DADFAILED: u32 = 0x08;
pub const IFA_F_DEPRECATED: u32 = 0x20;
pub const IFA_F_TENTATIVE: u32 = 0x40;

/// IP protocol family of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Family of `ip`.
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

/// A network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub index: u32,
    pub name: String,
    pub loopback: bool,
}

/// An address assigned to a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub link_index: u32,
    pub address: IpAddr,
    pub prefix_len: u8,
    pub flags: u32,
}

impl Address {
    /// The subnet this address belongs to.
    pub fn network(&self) -> Option<IpNet> {
        IpNet::new(self.address, self.prefix_len).ok()
    }

    /// Whether `ip` falls inside this address's subnet.
    pub fn contains(&self, ip: IpAddr) -> bool {
        self.network().is_some_and(|net| net.contains(&ip))
    }

    /// A /32 or /128 address, which carries no on-link subnet of its own.
    pub fn is_host(&self) -> bool {
        match self.address {
            IpAddr::V4(_) => self.prefix_len == 32,
            IpAddr::V6(_) => self.prefix_len == 128,
        }
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

/// Route type (`RTN_*`), reduced to what the queries care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Unicast,
    Local,
    Other,
}

/// A single-hop route. Multipath routes are split into one entry per hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub family: Family,
    /// `None` for a default route.
    pub destination: Option<IpAddr>,
    pub prefix_len: u8,
    pub output_link: Option<u32>,
    pub gateway: Option<IpAddr>,
    pub priority: u32,
    pub table: u32,
    pub kind: RouteKind,
}

impl Route {
    pub fn is_default(&self) -> bool {
        self.prefix_len == 0
    }

    /// Whether the destination prefix of this route covers `ip`.
    pub fn contains(&self, ip: IpAddr) -> bool {
        if Family::of(&ip) != self.family {
            return false;
        }
        match self.destination {
            None => self.prefix_len == 0,
            Some(dst) => IpNet::new(dst, self.prefix_len).is_ok_and(|net| net.contains(&ip)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.destination {
            Some(dst) => write!(f, "{}/{}", dst, self.prefix_len)?,
            None => write!(f, "default")?,
        }
        if let Some(gw) = self.gateway {
            write!(f, " via {}", gw)?;
        }
        if let Some(oif) = self.output_link {
            write!(f, " dev #{}", oif)?;
        }
        write!(f, " metric {}", self.priority)
    }
}

/// A local interface identity. Index 0 means "no interface".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    pub index: u32,
    pub name: String,
}

impl From<&Link> for Interface {
    fn from(link: &Link) -> Self {
        Self {
            index: link.index,
            name: link.name.clone(),
        }
    }
}
