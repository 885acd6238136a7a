/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Catalogue configuration.
//!
//! Configuration is loaded from a TOML file with defaults for every field,
//! so an empty file (or no file at all) yields a working single-catalogue
//! setup. Durations are expressed in milliseconds in the file and converted
//! once at load time.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A field combination is not usable
    #[error("invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Raw TOML shape; all fields optional so partial files work.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    catalogue_id: Option<String>,
    #[serde(default)]
    sync: RawSyncConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawSyncConfig {
    visibility_initial_backoff_ms: Option<u64>,
    visibility_max_backoff_ms: Option<u64>,
    visibility_deadline_ms: Option<u64>,
    event_buffer: Option<usize>,
}

/// Settings for the lifecycle synchronization hooks.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// First wait before re-checking search visibility of a fresh write
    pub visibility_initial_backoff: Duration,
    /// Upper bound for the exponential backoff between visibility checks
    pub visibility_max_backoff: Duration,
    /// Total budget for waiting on search visibility; a warning is logged
    /// when it is exhausted
    pub visibility_deadline: Duration,
    /// Capacity of the in-process event bus
    pub event_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            visibility_initial_backoff: Duration::from_millis(50),
            visibility_max_backoff: Duration::from_secs(2),
            visibility_deadline: Duration::from_secs(30),
            event_buffer: 256,
        }
    }
}

/// Top-level catalogue configuration.
#[derive(Debug, Clone)]
pub struct CatalogueConfig {
    /// Identifier of the catalogue this deployment serves. Resources from
    /// other catalogues are mirrored but never moderated here.
    pub catalogue_id: String,
    /// Synchronization hook settings
    pub sync: SyncConfig,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        CatalogueConfig {
            catalogue_id: "pinakes".to_string(),
            sync: SyncConfig::default(),
        }
    }
}

impl CatalogueConfig {
    /// Loads configuration from a TOML file, filling defaults for missing
    /// fields and validating the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = SyncConfig::default();
        let config = CatalogueConfig {
            catalogue_id: raw
                .catalogue_id
                .unwrap_or_else(|| CatalogueConfig::default().catalogue_id),
            sync: SyncConfig {
                visibility_initial_backoff: raw
                    .sync
                    .visibility_initial_backoff_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.visibility_initial_backoff),
                visibility_max_backoff: raw
                    .sync
                    .visibility_max_backoff_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.visibility_max_backoff),
                visibility_deadline: raw
                    .sync
                    .visibility_deadline_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.visibility_deadline),
                event_buffer: raw.sync.event_buffer.unwrap_or(defaults.event_buffer),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalogue_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "catalogue_id must not be empty".to_string(),
            });
        }
        if self.sync.visibility_initial_backoff > self.sync.visibility_max_backoff {
            return Err(ConfigError::Invalid {
                reason: "visibility_initial_backoff_ms exceeds visibility_max_backoff_ms"
                    .to_string(),
            });
        }
        if self.sync.visibility_deadline < self.sync.visibility_max_backoff {
            return Err(ConfigError::Invalid {
                reason: "visibility_deadline_ms is shorter than a single maximum backoff"
                    .to_string(),
            });
        }
        if self.sync.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                reason: "event_buffer must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CatalogueConfig::default();
        assert_eq!(config.catalogue_id, "pinakes");
        assert_eq!(config.sync.visibility_initial_backoff, Duration::from_millis(50));
        assert_eq!(config.sync.visibility_deadline, Duration::from_secs(30));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "catalogue_id = \"eosc\"").unwrap();
        writeln!(file, "[sync]").unwrap();
        writeln!(file, "visibility_deadline_ms = 5000").unwrap();
        let config = CatalogueConfig::load(file.path()).unwrap();
        assert_eq!(config.catalogue_id, "eosc");
        assert_eq!(config.sync.visibility_deadline, Duration::from_millis(5000));
        // untouched fields keep their defaults
        assert_eq!(config.sync.event_buffer, 256);
    }

    #[test]
    fn test_rejects_inverted_backoff() {
        let raw = RawConfig {
            catalogue_id: None,
            sync: RawSyncConfig {
                visibility_initial_backoff_ms: Some(10_000),
                visibility_max_backoff_ms: Some(100),
                visibility_deadline_ms: None,
                event_buffer: None,
            },
        };
        assert!(CatalogueConfig::from_raw(raw).is_err());
    }

    #[test]
    fn test_rejects_empty_catalogue_id() {
        let raw = RawConfig {
            catalogue_id: Some("  ".to_string()),
            sync: RawSyncConfig::default(),
        };
        assert!(CatalogueConfig::from_raw(raw).is_err());
    }
}
