//! Command-line interface for node-ip
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Node IP tools
///
/// Aids in the configuration of the default node IP.
#[derive(Parser, Debug)]
#[command(name = "node-ip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Keep retrying until it finds a suitable IP address. System errors will still abort
    #[arg(short = 'r', long = "retry-on-failure", global = true)]
    pub retry_on_failure: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a configured IP address that directly routes to the given Virtual IPs.
    /// If no Virtual IPs are provided or if the node isn't attached to the VIP
    /// subnet, it will pick an IP associated with the default route.
    Show {
        /// Virtual IPs
        #[arg(value_name = "VIP")]
        vips: Vec<String>,
    },

    /// Sets container runtime services to bind to a configured IP address that
    /// directly routes to the given Virtual IPs. If no Virtual IPs are provided
    /// or if the node isn't attached to the VIP subnet, it will pick an IP
    /// associated with the default route.
    Set {
        /// Virtual IPs
        #[arg(value_name = "VIP")]
        vips: Vec<String>,
    },

    /// Exits with zero status code when the node is attached to the VIP subnet,
    /// and non-zero otherwise.
    Vipable {
        /// Virtual IPs
        #[arg(value_name = "VIP", required = true)]
        vips: Vec<String>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Show { .. } => "show",
            Commands::Set { .. } => "set",
            Commands::Vipable { .. } => "vipable",
        }
    }
}
