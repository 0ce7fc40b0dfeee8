//! Common utilities and types shared across node-ip components.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
