//! Common error types for node-ip components.

use std::fmt;
use std::path::PathBuf;

/// A specialized Result type for node-ip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for node-ip operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The routing collaborator could not read kernel state.
    #[error("Netlink error: {0}")]
    Netlink(String),

    #[error("Failed to parse IP address {0}")]
    InvalidArgument(String),

    #[error("Failed to find node IP")]
    NoSuitableAddress,

    #[error("No suitable interface for any of the VIPs {0}")]
    NoAttachedInterface(String),

    #[error("Failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new netlink error.
    pub fn netlink(msg: impl fmt::Display) -> Self {
        Error::Netlink(msg.to_string())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument(arg: impl fmt::Display) -> Self {
        Error::InvalidArgument(arg.to_string())
    }

    /// Create a new persistence error for `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error.
    pub fn config(msg: impl fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}
