//! Netlink communication layer for routing state.
//!
//! This module provides low-level rtnetlink socket operations for dumping
//! links, addresses and routes from the kernel.

use common::{Error, Result};
use netlink_packet_core::{NLM_F_DUMP, NLM_F_REQUEST, NetlinkMessage, NetlinkPayload};
use netlink_packet_route::RouteNetlinkMessage;
use netlink_packet_route::address::AddressMessage;
use netlink_packet_route::link::LinkMessage;
use netlink_packet_route::route::RouteMessage;
use netlink_sys::{Socket, SocketAddr, protocols::NETLINK_ROUTE};
use tracing::{debug, trace};

use crate::messages::{address_from_message, link_from_message, routes_from_message};
use crate::types::{Address, Link, Route};

/// Netlink messages are padded to 4 bytes.
fn align(len: usize) -> usize {
    (len + 3) & !3
}

/// Netlink socket wrapper for rtnetlink dumps.
pub struct NetlinkSocket {
    socket: Socket,
    sequence: u32,
}

impl NetlinkSocket {
    /// Create a new rtnetlink socket connected to the kernel.
    pub fn new() -> Result<Self> {
        debug!("Creating rtnetlink socket");

        let mut socket = Socket::new(NETLINK_ROUTE)
            .map_err(|e| Error::netlink(format!("Failed to create netlink socket: {}", e)))?;

        socket
            .bind(&SocketAddr::new(0, 0))
            .map_err(|e| Error::netlink(format!("Failed to bind netlink socket: {}", e)))?;

        socket
            .connect(&SocketAddr::new(0, 0))
            .map_err(|e| Error::netlink(format!("Failed to connect netlink socket: {}", e)))?;

        Ok(Self {
            socket,
            sequence: 0,
        })
    }

    /// Get the next sequence number.
    fn next_sequence(&mut self) -> u32 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    /// Send a netlink message.
    fn send_message(&mut self, message: &mut NetlinkMessage<RouteNetlinkMessage>) -> Result<()> {
        message.finalize();
        let mut buf = vec![0u8; message.buffer_len()];
        message.serialize(&mut buf[..]);

        trace!("Sending netlink message: {:?}", message);

        self.socket
            .send(&buf[..], 0)
            .map_err(|e| Error::netlink(format!("Failed to send netlink message: {}", e)))?;

        Ok(())
    }

    /// Issue a dump request and collect every reply until `NLMSG_DONE`.
    fn dump(&mut self, request: RouteNetlinkMessage) -> Result<Vec<RouteNetlinkMessage>> {
        let sequence = self.next_sequence();
        let mut nlmsg = NetlinkMessage::from(request);
        nlmsg.header.flags = NLM_F_REQUEST | NLM_F_DUMP;
        nlmsg.header.sequence_number = sequence;

        self.send_message(&mut nlmsg)?;

        let mut replies = Vec::new();
        loop {
            let (buf, _) = self
                .socket
                .recv_from_full()
                .map_err(|e| Error::netlink(format!("Failed to receive netlink message: {}", e)))?;

            let mut offset = 0;
            while offset < buf.len() {
                let message = NetlinkMessage::<RouteNetlinkMessage>::deserialize(&buf[offset..])
                    .map_err(|e| Error::netlink(format!("Failed to parse netlink message: {}", e)))?;

                let len = message.header.length as usize;
                if len == 0 {
                    return Err(Error::netlink("Zero-length netlink message"));
                }
                offset += align(len);

                if message.header.sequence_number != sequence {
                    trace!(
                        "Ignoring netlink message with sequence {}",
                        message.header.sequence_number
                    );
                    continue;
                }

                match message.payload {
                    NetlinkPayload::Done(_) => {
                        trace!("Dump complete with {} replies", replies.len());
                        return Ok(replies);
                    }
                    NetlinkPayload::Error(err) => {
                        if let Some(code) = err.code {
                            return Err(Error::netlink(format!(
                                "Dump request failed: error code {}",
                                code
                            )));
                        }
                    }
                    NetlinkPayload::InnerMessage(inner) => replies.push(inner),
                    _ => {}
                }
            }
        }
    }

    /// Dump all links.
    pub fn links(&mut self) -> Result<Vec<Link>> {
        let replies = self.dump(RouteNetlinkMessage::GetLink(LinkMessage::default()))?;
        Ok(replies
            .iter()
            .filter_map(|reply| match reply {
                RouteNetlinkMessage::NewLink(msg) => Some(link_from_message(msg)),
                _ => None,
            })
            .collect())
    }

    /// Dump all addresses of both families.
    pub fn addresses(&mut self) -> Result<Vec<Address>> {
        let replies = self.dump(RouteNetlinkMessage::GetAddress(AddressMessage::default()))?;
        Ok(replies
            .iter()
            .filter_map(|reply| match reply {
                RouteNetlinkMessage::NewAddress(msg) => address_from_message(msg),
                _ => None,
            })
            .collect())
    }

    /// Dump all routes of both families, across all tables.
    pub fn routes(&mut self) -> Result<Vec<Route>> {
        let replies = self.dump(RouteNetlinkMessage::GetRoute(RouteMessage::default()))?;
        Ok(replies
            .iter()
            .flat_map(|reply| match reply {
                RouteNetlinkMessage::NewRoute(msg) => routes_from_message(msg),
                _ => Vec::new(),
            })
            .collect())
    }
}
