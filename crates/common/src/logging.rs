//! Logging utilities for node-ip components.
//!
//! Everything is written to stderr; stdout is reserved for command output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse a format name as used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Whether `directives` is a valid filter string such as `info,routing=debug`.
pub fn valid_directives(directives: &str) -> bool {
    EnvFilter::try_new(directives).is_ok()
}

/// Build the filter: RUST_LOG wins, then `level`, then INFO.
fn filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing.
///
/// Uses the RUST_LOG environment variable to control log levels, falling back
/// to `level` and then INFO.
pub fn init(level: Option<&str>, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(filter(level));
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
