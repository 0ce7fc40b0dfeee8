//! VIP subnet attachment checks.

use common::{Error, Result};
use routing::Interface;
use tracing::{debug, info};

use crate::resolver::InterfaceLocator;
use crate::types::VirtualIp;

/// Outcome of checking a single VIP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Attached(Interface),
    NotAttached,
}

/// Check whether a local interface carries `vip`'s subnet.
///
/// An interface index of 0 from the locator means no match.
pub fn is_attached<L>(locator: &L, vip: &VirtualIp) -> Result<Attachment>
where
    L: InterfaceLocator + ?Sized,
{
    let iface = locator.suitable_interface(vip.addr())?;
    if iface.index == 0 {
        debug!(vip = %vip, "No interface for VIP");
        return Ok(Attachment::NotAttached);
    }
    Ok(Attachment::Attached(iface))
}

/// Return the first VIP that is attached, together with its interface.
///
/// Locator errors abort immediately.
pub fn find_attached<L>(locator: &L, vips: &[VirtualIp]) -> Result<(VirtualIp, Interface)>
where
    L: InterfaceLocator + ?Sized,
{
    for vip in vips {
        if let Attachment::Attached(iface) = is_attached(locator, vip)? {
            info!(interface = %iface.name, vip = %vip, "Found interface for VIP");
            return Ok((*vip, iface));
        }
    }

    let listed: Vec<String> = vips.iter().map(ToString::to_string).collect();
    Err(Error::NoAttachedInterface(format!("[{}]", listed.join(" "))))
}
