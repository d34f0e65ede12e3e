use std::path::Path;

use nab_schema::{Schema, DEFAULT_NAMESPACE};
use nab_store::memory::DEFAULT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::error::{PeerError, PeerResult};

/// Peer configuration.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Prefix of every non-user soul.
    pub namespace: String,
    /// Per-soul subscription buffer of the in-memory store.
    pub channel_capacity: usize,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl PeerConfig {
    pub fn from_toml_str(s: &str) -> PeerResult<Self> {
        toml::from_str(s).map_err(|e| PeerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> PeerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The soul schema this config describes.
    pub fn schema(&self) -> PeerResult<Schema> {
        Ok(Schema::new(&self.namespace)?)
    }
}
