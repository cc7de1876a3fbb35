//! Epoch and chain parameters, loaded from TOML.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::epoch::{epoch_number, is_end_of_period};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Consensus parameters shared by every validator on a chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsensusConfig {
    /// Blocks per epoch.
    #[serde(default = "default_epoch_size")]
    pub epoch_size: u64,

    /// Blocks per sprint. An epoch is a whole number of sprints.
    #[serde(default = "default_sprint_size")]
    pub sprint_size: u64,

    /// Past epoch snapshots kept besides the newest one.
    #[serde(default = "default_snapshot_retention")]
    pub snapshot_retention: usize,

    /// Mixed into every checkpoint hash.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

fn default_epoch_size() -> u64 {
    10
}

fn default_sprint_size() -> u64 {
    5
}

fn default_snapshot_retention() -> usize {
    4
}

fn default_chain_id() -> u64 {
    100
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            epoch_size: default_epoch_size(),
            sprint_size: default_sprint_size(),
            snapshot_retention: default_snapshot_retention(),
            chain_id: default_chain_id(),
        }
    }
}

impl ConsensusConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epoch_size == 0 {
            return Err(ConfigError::Invalid("epoch_size must be non-zero".into()));
        }
        if self.sprint_size == 0 {
            return Err(ConfigError::Invalid("sprint_size must be non-zero".into()));
        }
        if self.epoch_size % self.sprint_size != 0 {
            return Err(ConfigError::Invalid(format!(
                "epoch_size {} is not a multiple of sprint_size {}",
                self.epoch_size, self.sprint_size
            )));
        }
        Ok(())
    }

    /// Epoch that `block_number` belongs to under this config.
    pub fn epoch_of(&self, block_number: u64) -> u64 {
        epoch_number(block_number, self.epoch_size)
    }

    /// Whether `block_number` closes a sprint.
    ///
    /// Pending state-sync events are committed on these blocks. Every epoch
    /// end is also a sprint end.
    pub fn is_sprint_end(&self, block_number: u64) -> bool {
        is_end_of_period(block_number, self.sprint_size)
    }

    pub fn with_epoch_size(mut self, epoch_size: u64) -> Self {
        self.epoch_size = epoch_size;
        self
    }

    pub fn with_sprint_size(mut self, sprint_size: u64) -> Self {
        self.sprint_size = sprint_size;
        self
    }

    pub fn with_snapshot_retention(mut self, retention: usize) -> Self {
        self.snapshot_retention = retention;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }
}
