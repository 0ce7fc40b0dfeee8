//! Address filters.

use std::net::IpAddr;

use crate::types::{Address, IFA_F_DADFAILED, IFA_F_DEPRECATED, IFA_F_TEMPORARY, IFA_F_TENTATIVE};

/// Predicate applied to every candidate address.
pub type AddressFilter = fn(&Address) -> bool;

/// Whether `address` may serve as a node's primary IP.
///
/// Rejects loopback, unspecified, multicast and link-local addresses, and IPv6
/// addresses that are deprecated, temporary (privacy extensions) or have not
/// completed duplicate address detection.
pub fn valid_node_address(address: &Address) -> bool {
    match address.address {
        IpAddr::V4(ip) => {
            !(ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() || ip.is_link_local())
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback()
                || ip.is_unspecified()
                || ip.is_multicast()
                || ip.is_unicast_link_local()
            {
                return false;
            }
            !(address.has_flag(IFA_F_DEPRECATED)
                || address.has_flag(IFA_F_TEMPORARY)
                || address.has_flag(IFA_F_TENTATIVE)
                || address.has_flag(IFA_F_DADFAILED))
        }
    }
}
