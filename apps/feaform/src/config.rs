//! # Application Configuration
//!
//! Optional TOML file with two tables:
//!
//! ```toml
//! [engine]
//! max_depth = 128
//! copy_suffix = "_dup"
//!
//! [output]
//! format = "minimal"
//! ```
//!
//! Missing tables and keys take their defaults. Command-line flags override
//! file values.

use feaform_core::{EngineConfig, FeaError, SaveFormat};
use serde::Deserialize;
use std::path::Path;

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// The `[output]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Style of saved files.
    pub format: SaveFormat,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, FeaError> {
        toml::from_str(text)
            .map_err(|e| FeaError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Read configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, FeaError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            FeaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(FeaError::SerializationError(format!(
                "Config size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            FeaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self, FeaError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Apply the `--format` flag on top of the file value.
    pub fn with_format_override(mut self, format: Option<&str>) -> Result<Self, FeaError> {
        if let Some(format) = format {
            self.output.format = format.parse()?;
        }
        Ok(self)
    }
}
