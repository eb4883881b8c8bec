//! # Persistence Format
//!
//! A persisted file is one root form as UTF-8 JSON.
//!
//! Three output styles:
//! - `pretty`: indented, every key written
//! - `compact`: no whitespace, every key written
//! - `minimal`: compact with null-valued keys dropped
//!
//! Reading accepts all three: an absent optional header key reads as `null`.
//!
//! ## Limits
//!
//! Documents larger than `MAX_DOCUMENT_SIZE` are rejected before parsing,
//! both for in-memory text and for files (checked on metadata, before the
//! file is read). Documents nested deeper than `MAX_DOCUMENT_NESTING` JSON
//! levels fail to parse, which bounds the entity depth a file can carry
//! below the in-memory `max_depth`.

use crate::entity::{Instance, Materialize, Shared};
use crate::primitives::{MAX_DOCUMENT_NESTING, MAX_DOCUMENT_SIZE};
use crate::{Engine, FeaError, Form, Kind, Policy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// SAVE FORMAT
// =============================================================================

/// Output style of a saved form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Pretty,
    Compact,
    Minimal,
}

impl FromStr for SaveFormat {
    type Err = FeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "minimal" => Ok(Self::Minimal),
            other => Err(FeaError::SerializationError(format!(
                "Unknown save format '{}' (expected pretty, compact or minimal)",
                other
            ))),
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Minimal => "minimal",
        })
    }
}

// =============================================================================
// TEXT CONVERSION
// =============================================================================

/// Render a form as JSON text.
pub fn form_to_string(form: &Form, format: SaveFormat) -> Result<String, FeaError> {
    let result = match format {
        SaveFormat::Pretty => serde_json::to_string_pretty(form),
        SaveFormat::Compact => serde_json::to_string(form),
        SaveFormat::Minimal => {
            let mut stripped = form.clone();
            stripped.strip_nulls();
            serde_json::to_string(&stripped)
        }
    };
    result.map_err(|e| FeaError::SerializationError(e.to_string()))
}

/// Parse JSON text into a form. The root must be an object.
pub fn form_from_str(text: &str) -> Result<Form, FeaError> {
    if text.len() > MAX_DOCUMENT_SIZE {
        return Err(FeaError::SerializationError(format!(
            "Document size {} bytes exceeds maximum allowed {} bytes",
            text.len(),
            MAX_DOCUMENT_SIZE
        )));
    }
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        if e.to_string().starts_with("recursion limit exceeded") {
            FeaError::SerializationError(format!(
                "Document nesting exceeds maximum allowed {} levels: {}",
                MAX_DOCUMENT_NESTING, e
            ))
        } else {
            FeaError::SerializationError(format!("Invalid JSON: {}", e))
        }
    })?;
    Form::from_value(value)
}

// =============================================================================
// FILE I/O
// =============================================================================

/// Write a form to `path`.
pub fn save_form(form: &Form, path: impl AsRef<Path>, format: SaveFormat) -> Result<(), FeaError> {
    let path = path.as_ref();
    let text = form_to_string(form, format)?;
    std::fs::write(path, text).map_err(|e| {
        FeaError::IoError(format!("Cannot write '{}': {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), %format, "saved form");
    Ok(())
}

/// Describe `instance` and write it to `path`.
pub fn save(instance: &Instance, path: impl AsRef<Path>, format: SaveFormat) -> Result<(), FeaError> {
    save_form(&instance.describe(), path, format)
}

fn read_form(path: &Path) -> Result<Form, FeaError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        FeaError::IoError(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_DOCUMENT_SIZE as u64 {
        return Err(FeaError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_DOCUMENT_SIZE
        )));
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        FeaError::IoError(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    form_from_str(&text)
}

impl Engine {
    /// Read the form at `path` without materializing it.
    pub fn read_form(&self, path: impl AsRef<Path>) -> Result<Form, FeaError> {
        read_form(path.as_ref())
    }

    /// Load `path` as `root_kind` under PRESERVE.
    pub fn load(&self, path: impl AsRef<Path>, root_kind: &Kind) -> Result<Instance, FeaError> {
        let form = read_form(path.as_ref())?;
        self.materialize(root_kind, &form, Policy::Preserve)
    }

    /// Load `path` as the kind its root form declares.
    pub fn load_any(&self, path: impl AsRef<Path>) -> Result<Instance, FeaError> {
        let form = read_form(path.as_ref())?;
        let kind = form.kind()?;
        self.materialize(&kind, &form, Policy::Preserve)
    }

    /// Load `path` as `T`.
    pub fn load_typed<T: Materialize>(&self, path: impl AsRef<Path>) -> Result<Shared<T>, FeaError> {
        let form = read_form(path.as_ref())?;
        self.materialize_typed::<T>(&form, Policy::Preserve)
    }

    /// Load JSON text as `root_kind` under PRESERVE.
    pub fn load_str(&self, text: &str, root_kind: &Kind) -> Result<Instance, FeaError> {
        let form = form_from_str(text)?;
        self.materialize(root_kind, &form, Policy::Preserve)
    }
}

// =============================================================================
// TESTS
// =============================================================================
