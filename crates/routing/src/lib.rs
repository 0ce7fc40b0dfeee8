//! Read-only view of Linux routing state via rtnetlink.
//!
//! This crate dumps links, addresses and routes through direct netlink
//! syscalls and answers the questions node address selection needs: which
//! local addresses route toward a set of targets, which sit on the default
//! route, and which interface carries a given address.
//!
//! # Example
//!
//! ```no_run
//! use routing::{Topology, valid_node_address};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let topology = Topology::capture()?;
//!
//! for ip in topology.addresses_default(valid_node_address) {
//!     println!("default route address: {}", ip);
//! }
//! # Ok(())
//! # }
//! ```

mod filter;
mod messages;
mod netlink;
mod topology;
mod types;

pub use filter::{AddressFilter, valid_node_address};
pub use netlink::NetlinkSocket;
pub use topology::Topology;
pub use types::{
    Address, Family, IFA_F_DADFAILED, IFA_F_DEPRECATED, IFA_F_TEMPORARY, IFA_F_TENTATIVE,
    Interface, Link, MAIN_TABLE, Route, RouteKind,
};
