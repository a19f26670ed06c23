//! Runtime configuration for the booking service.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid reference policy: {0}")]
    Policy(&'static str),
}

/// Length and retry budget for booking references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePolicy {
    pub length: usize,
    pub max_attempts: usize,
    /// Used once `max_attempts` candidates have all collided.
    pub fallback_length: usize,
    pub fallback_attempts: usize,
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        Self {
            length: 8,
            max_attempts: 64,
            fallback_length: 12,
            fallback_attempts: 64,
        }
    }
}

impl ReferencePolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::Policy("length must be positive"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Policy("max_attempts must be positive"));
        }
        if self.fallback_attempts > 0 && self.fallback_length <= self.length {
            return Err(ConfigError::Policy("fallback_length must exceed length"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub db_path: PathBuf,
    pub reference: ReferencePolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("bookings.db"),
            reference: ReferencePolicy::default(),
        }
    }
}

impl BookingConfig {
    /// Reads a JSON config file; absent keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.reference.validate()?;
        Ok(config)
    }
}
