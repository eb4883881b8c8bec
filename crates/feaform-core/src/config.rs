//! # Engine Configuration
//!
//! Tunables of the materialization engine. Deserializable so the binary can
//! read them from the `[engine]` table of its TOML config.

use crate::primitives::{COPY_SUFFIX, MAX_MATERIALIZE_DEPTH};
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum nesting depth of one materialization.
    pub max_depth: usize,
    /// Suffix appended to display names under the FRESH policy.
    pub copy_suffix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_MATERIALIZE_DEPTH,
            copy_suffix: COPY_SUFFIX.to_string(),
        }
    }
}
