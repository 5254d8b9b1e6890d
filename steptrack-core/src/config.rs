//! Track configuration
//!
//! A `TrackConfig` names the reserved payload keys and optionally pins the
//! track id and origin caller. It deserializes from partial YAML documents,
//! so a hosting application can keep it next to its own settings:
//!
//! ```yaml
//! merge_key: fold
//! error_key: failure
//! track_id: request-42
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, TrackError};

/// Per-track options recognized by `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Payload key that folds a push into the previous step
    pub merge_key: String,

    /// Payload key marking a step as a failure
    pub error_key: String,

    /// Fixed track id (defaults to the current thread's id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,

    /// Fixed origin caller (defaults to the `init` call site)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
}

fn default_merge_key() -> String {
    "merge".to_string()
}

fn default_error_key() -> String {
    "error".to_string()
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            merge_key: default_merge_key(),
            error_key: default_error_key(),
            track_id: None,
            caller: None,
        }
    }
}

impl TrackConfig {
    pub fn with_track_id(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn with_merge_key(mut self, key: impl Into<String>) -> Self {
        self.merge_key = key.into();
        self
    }

    pub fn with_error_key(mut self, key: impl Into<String>) -> Self {
        self.error_key = key.into();
        self
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: TrackConfig = serde_yaml_ng::from_str(content)
            .map_err(|source| TrackError::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading track configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|source| TrackError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&content)
    }

    /// Reject reserved keys that would make push/finalize ambiguous.
    pub fn validate(&self) -> Result<()> {
        if self.merge_key.is_empty() || self.error_key.is_empty() {
            return Err(TrackError::Configuration(
                "merge_key and error_key must not be empty".into(),
            ));
        }
        if self.merge_key == self.error_key {
            return Err(TrackError::Configuration(format!(
                "merge_key and error_key must differ (both are '{}')",
                self.merge_key
            )));
        }
        Ok(())
    }
}
