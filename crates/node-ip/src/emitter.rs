//! systemd drop-in overrides carrying the chosen node IP.
//!
//! The kubelet file is written before the CRI-O file. A failure on the second
//! leaves the first in place; there is no rollback.

use common::{Error, Result};
use std::fs::{self, DirBuilder};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::ChosenAddress;

pub const KUBELET_OVERRIDE_PATH: &str = "/etc/systemd/system/kubelet.service.d/20-nodenet.conf";
pub const CRIO_OVERRIDE_PATH: &str = "/etc/systemd/system/crio.service.d/20-nodenet.conf";

/// Mode for created drop-in directories (rwxr-xr-x).
const OVERRIDE_DIR_MODE: u32 = 0o755;

/// Body of the kubelet drop-in.
pub fn kubelet_override(address: &ChosenAddress) -> String {
    format!("[Service]\nEnvironment=\"KUBELET_NODE_IP={}\"\n", address)
}

/// Body of the CRI-O drop-in.
pub fn crio_override(address: &ChosenAddress) -> String {
    format!(
        "[Service]\nEnvironment=\"CONTAINER_STREAM_ADDRESS={}\"\n",
        address
    )
}

/// Where the two drop-ins are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePaths {
    pub kubelet: PathBuf,
    pub crio: PathBuf,
}

impl Default for OverridePaths {
    fn default() -> Self {
        Self {
            kubelet: PathBuf::from(KUBELET_OVERRIDE_PATH),
            crio: PathBuf::from(CRIO_OVERRIDE_PATH),
        }
    }
}

/// Writes both drop-ins for a chosen address.
#[derive(Debug, Clone, Default)]
pub struct ConfigEmitter {
    paths: OverridePaths,
}

impl ConfigEmitter {
    pub fn new(paths: OverridePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &OverridePaths {
        &self.paths
    }

    /// Write the kubelet then the CRI-O override.
    pub fn emit(&self, address: &ChosenAddress) -> Result<()> {
        write_override("Kubelet", &self.paths.kubelet, &kubelet_override(address))?;
        write_override("CRI-O", &self.paths.crio, &crio_override(address))?;
        Ok(())
    }
}

fn write_override(service: &str, path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        DirBuilder::new()
            .recursive(true)
            .mode(OVERRIDE_DIR_MODE)
            .create(dir)
            .map_err(|e| Error::persistence(dir, e))?;
    }

    info!("Opening {} service override path {}", service, path.display());
    info!("Writing {} service override with content {}", service, content);
    fs::write(path, content).map_err(|e| Error::persistence(path, e))
}
