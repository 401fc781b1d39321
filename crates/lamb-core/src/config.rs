// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loadable configuration for the logging service.

use crate::options::FormatOptions;
use crate::DEFAULT_ROTATION_THRESHOLD;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or saving a [`LoggerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access logger config '{path}': {source}")]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid JSON or does not match the schema.
    #[error("invalid logger config: {0}")]
    Parse(#[from] serde_json::Error),
    /// `bridge_level` does not name a `log` level filter.
    #[error("unknown bridge level '{0}'")]
    InvalidLevel(String),
}

fn default_append() -> bool {
    true
}

/// One subsystem-to-file mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Subsystem tag routed to this file (e.g. "Renderer", "Global").
    pub subsystem: String,
    /// Path of the active log file. Missing parent directories are created.
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it.
    #[serde(default = "default_append")]
    pub append: bool,
}

/// Complete logger configuration, typically read from a JSON file at startup.
///
/// Every field is optional in the JSON form; missing fields take the values
/// of [`LoggerConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Master switch. When false, producing a record costs one atomic load.
    pub enabled: bool,
    /// Mirror lines to standard output.
    pub console: bool,
    /// Color console lines in human-readable mode.
    pub colors: bool,
    /// Write structured (one JSON object per line) output.
    pub structured: bool,
    /// Size in bytes at which a sink file is rotated.
    pub rotation_threshold: u64,
    /// Maximum `log` crate level forwarded by the bridge.
    pub bridge_level: String,
    /// Files to open, in registration order.
    pub sinks: Vec<SinkConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let options = FormatOptions::default();
        Self {
            enabled: true,
            console: options.console,
            colors: options.colors,
            structured: options.structured,
            rotation_threshold: DEFAULT_ROTATION_THRESHOLD,
            bridge_level: "info".to_string(),
            sinks: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.bridge_level_filter()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The initialization flags carried by this configuration.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions::new(self.console, self.colors, self.structured)
    }

    /// Parses `bridge_level` into a `log` level filter.
    pub fn bridge_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.bridge_level
            .parse()
            .map_err(|_| ConfigError::InvalidLevel(self.bridge_level.clone()))
    }
}
