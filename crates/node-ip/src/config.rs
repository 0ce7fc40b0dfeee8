//! Configuration loading and validation for node-ip

use crate::emitter::{CRIO_OVERRIDE_PATH, KUBELET_OVERRIDE_PATH, OverridePaths};
use common::logging::{self, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl From<ConfigError> for common::Error {
    fn from(err: ConfigError) -> Self {
        common::Error::config(err)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub overrides: OverrideSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.overrides.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Drop-in file locations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_distinct_paths"))]
pub struct OverrideSettings {
    #[validate(custom = "validate_override_path")]
    pub kubelet: PathBuf,

    #[validate(custom = "validate_override_path")]
    pub crio: PathBuf,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    #[validate(custom = "validate_log_level")]
    pub level: Option<String>,

    #[validate(custom = "validate_log_format")]
    pub format: Option<String>,
}

impl Default for OverrideSettings {
    fn default() -> Self {
        Self {
            kubelet: PathBuf::from(KUBELET_OVERRIDE_PATH),
            crio: PathBuf::from(CRIO_OVERRIDE_PATH),
        }
    }
}

// Custom validators

fn validate_override_path(path: &PathBuf) -> Result<(), ValidationError> {
    if !path.is_absolute() {
        return Err(ValidationError::new("override_path_not_absolute"));
    }
    if path.file_name().is_none() || path.parent().is_none() {
        return Err(ValidationError::new("override_path_not_a_file"));
    }
    Ok(())
}

fn validate_distinct_paths(settings: &OverrideSettings) -> Result<(), ValidationError> {
    if settings.kubelet == settings.crio {
        return Err(ValidationError::new("override_paths_not_distinct"));
    }
    Ok(())
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if !logging::valid_directives(level) {
        return Err(ValidationError::new("log_level_invalid"));
    }
    Ok(())
}

fn validate_log_format(format: &str) -> Result<(), ValidationError> {
    if LogFormat::from_name(format).is_none() {
        return Err(ValidationError::new("log_format_invalid"));
    }
    Ok(())
}

// Configuration loading implementation

impl Config {
    /// Find the configuration file to use.
    ///
    /// An explicit path must exist. Otherwise the standard locations are
    /// searched and `None` means built-in defaults apply.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        match explicit {
            Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(ConfigError::FileNotFound(path.to_path_buf())),
            None => Ok(Self::find_config_file()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Locate and load, falling back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate(explicit)? {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/node-ip/node-ip.yaml")];

        if let Some(home_path) = Self::home_config_path() {
            paths.push(home_path);
        }

        paths.push(PathBuf::from("./node-ip.yaml"));

        paths.into_iter().find(|p| p.is_file())
    }

    /// Get home directory config path
    fn home_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/node-ip/node-ip.yaml"))
    }

    pub fn override_paths(&self) -> OverridePaths {
        OverridePaths {
            kubelet: self.overrides.kubelet.clone(),
            crio: self.overrides.crio.clone(),
        }
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .format
            .as_deref()
            .and_then(LogFormat::from_name)
            .unwrap_or_default()
    }
}
