//! Target configuration — JSON file describing the workbook and its streams.
//!
//! # Shape
//!
//! ```json
//! {
//!   "user_id": "ops@example.com",
//!   "workbook_path": "reports/pipeline.xlsx",
//!   "api_version": "v1.0",
//!   "access_token": "...",
//!   "max_batch_size": 10000,
//!   "streams": {
//!     "users": { "primary_key": "id" }
//!   }
//! }
//! ```
//!
//! All REST endpoints are addressed relative to [`SyncConfig::base_url`]:
//! `https://graph.microsoft.com/{api_version}/users/{user_id}/drive/root:/{workbook_path}:/`

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default cap on records written in one batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10_000;

const GRAPH_ROOT: &str = "https://graph.microsoft.com";

fn default_api_version() -> String {
    "v1.0".to_owned()
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

/// Per-stream overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Field whose value matches a record to an existing row. Single field
    /// only; composite keys are unsupported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

/// Top-level target configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Graph user whose drive holds the workbook.
    pub user_id: String,
    /// Drive-relative path to the workbook file.
    pub workbook_path: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Bearer token presented on every request.
    pub access_token: String,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    #[serde(default)]
    pub streams: HashMap<String, StreamSettings>,
}

impl SyncConfig {
    /// Load and validate a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: SyncConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.user_id.is_empty() {
            return Err(ConfigError::MissingField { field: "user_id" });
        }
        if self.workbook_path.is_empty() {
            return Err(ConfigError::MissingField {
                field: "workbook_path",
            });
        }
        if self.access_token.is_empty() {
            return Err(ConfigError::MissingField {
                field: "access_token",
            });
        }
        Ok(())
    }

    /// Workbook-root URL all endpoints are joined onto.
    pub fn base_url(&self) -> String {
        format!(
            "{GRAPH_ROOT}/{}/users/{}/drive/root:/{}:/",
            self.api_version, self.user_id, self.workbook_path
        )
    }

    /// Primary key configured for `stream`, if any.
    pub fn primary_key(&self, stream: &str) -> Option<&str> {
        self.streams
            .get(stream)
            .and_then(|s| s.primary_key.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
