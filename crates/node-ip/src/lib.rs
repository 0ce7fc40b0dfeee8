//! node-ip - node identity address selection
//!
//! Chooses the single local address a cluster node uses as its identity for
//! kubelet and the container runtime, and persists it as systemd drop-ins.
//!
//! # Selection
//!
//! - Addresses with a direct route toward the given VIPs are preferred
//! - Otherwise the addresses on the default route are used
//! - The first candidate in resolver order wins
//! - With retry enabled, selection re-runs every second until a candidate
//!   appears; routing read failures always abort
//!
//! # Components
//!
//! - **Selector**: retry and fallback orchestration
//! - **Attachment**: VIP subnet membership for `vipable`
//! - **Emitter**: kubelet and CRI-O override files
//! - **Resolver**: seams to the host, backed by the `routing` crate

pub mod attachment;
pub mod cli;
pub mod commands;
pub mod config;
pub mod emitter;
pub mod resolver;
pub mod selector;
pub mod types;

pub use attachment::{Attachment, find_attached, is_attached};
pub use cli::{Cli, Commands};
pub use commands::App;
pub use config::{Config, ConfigError};
pub use emitter::{
    CRIO_OVERRIDE_PATH, ConfigEmitter, KUBELET_OVERRIDE_PATH, OverridePaths, crio_override,
    kubelet_override,
};
pub use resolver::{AddressResolver, InterfaceLocator, NetlinkResolver, Sleeper, ThreadSleeper};
pub use routing::{AddressFilter, Interface, valid_node_address};
pub use selector::NodeIpSelector;
pub use types::{ChosenAddress, RETRY_INTERVAL, RetryPolicy, VirtualIp, parse_vips};
