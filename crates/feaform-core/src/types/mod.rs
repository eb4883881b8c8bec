//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every part of the engine:
//! - Identity tokens (`Uid`)
//! - Kind descriptors (`Kind`)
//! - Entity headers (`Header`, `OwnerRef`)
//! - Identity policy (`Policy`)
//! - Error types (`FeaError`)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTITY TOKEN
// =============================================================================

/// Opaque, globally-unique identity token of a live entity.
///
/// Tokens are minted once at construction and travel through
/// describe/rebuild as strings. Any string is accepted when reading a form;
/// freshly minted tokens are UUID v4 strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Mint a new, never-before-seen token.
    #[must_use]
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an existing token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// KIND
// =============================================================================

/// The concrete kind of an entity: its type name and logical location.
///
/// A form carries both, so a reader can find the rebuilder without knowing
/// the kind ahead of time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Kind {
    /// Logical location (namespace) of the kind, e.g. `fea.model.nodes`.
    pub location: String,
    /// Type name within the location, e.g. `Node`.
    pub name: String,
}

impl Kind {
    /// Create a kind from its location and type name.
    #[must_use]
    pub fn new(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
        }
    }

    /// The kind a `Materialize` implementor declares for itself.
    #[must_use]
    pub fn of<T: crate::Materialize>() -> Self {
        Self::new(T::LOCATION, T::TYPE_NAME)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.location, self.name)
    }
}

// =============================================================================
// HEADER
// =============================================================================

/// Non-owning back-reference annotation: `[owner_type, owner_identity]`.
///
/// Never resolved into a live pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Uid)", into = "(String, Uid)")]
pub struct OwnerRef {
    pub kind: String,
    pub identity: Uid,
}

impl OwnerRef {
    #[must_use]
    pub fn new(kind: impl Into<String>, identity: Uid) -> Self {
        Self {
            kind: kind.into(),
            identity,
        }
    }
}

impl From<(String, Uid)> for OwnerRef {
    fn from((kind, identity): (String, Uid)) -> Self {
        Self { kind, identity }
    }
}

impl From<OwnerRef> for (String, Uid) {
    fn from(owner: OwnerRef) -> Self {
        (owner.kind, owner.identity)
    }
}

/// The state every entity carries regardless of its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Identity token.
    pub identity: Uid,
    /// Human-readable name. Not required to be unique.
    pub display_name: String,
    /// Position of the entity inside its owner, if it has one.
    pub position_key: Option<u64>,
    /// Annotation naming the owner.
    pub owner: Option<OwnerRef>,
}

impl Header {
    /// Create a header with a fresh identity and a generated display name.
    ///
    /// The generated name is the upper-case letters of the type name followed
    /// by the first eight characters of the token, e.g. `BE_3f2a9c1d`.
    #[must_use]
    pub fn new(type_name: &str) -> Self {
        let identity = Uid::mint();
        let initials: String = type_name.chars().filter(char::is_ascii_uppercase).collect();
        let short: String = identity.as_str().chars().take(8).collect();
        Self {
            display_name: format!("{}_{}", initials, short),
            identity,
            position_key: None,
            owner: None,
        }
    }

    /// Create a header with a fresh identity and the given display name.
    #[must_use]
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            identity: Uid::mint(),
            display_name: display_name.into(),
            position_key: None,
            owner: None,
        }
    }
}

// =============================================================================
// IDENTITY POLICY
// =============================================================================

/// Identity policy applied by the materialization wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Faithful reconstruction: every output token equals its input token.
    #[default]
    Preserve,
    /// Independent duplicate: every output token is newly minted and display
    /// names receive the copy suffix.
    Fresh,
}

impl Policy {
    /// Map the `preserve_identity` flag of the copy facade onto a policy.
    #[must_use]
    pub const fn from_preserve(preserve_identity: bool) -> Self {
        if preserve_identity {
            Self::Preserve
        } else {
            Self::Fresh
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the feaform engine.
///
/// - No silent failures
/// - Use `Result<T, FeaError>` for fallible operations
/// - The engine never panics; every failure surfaces to the caller
#[derive(Debug, Error)]
pub enum FeaError {
    /// The form is not a well-formed entity description.
    #[error("Malformed form: {0}")]
    MalformedForm(String),

    /// A required field is absent or null.
    #[error("Missing field '{field}' in {kind} form")]
    MissingField { kind: String, field: String },

    /// A field is present but has the wrong shape.
    #[error("Invalid field '{field}' in {kind} form: expected {expected}")]
    InvalidField {
        kind: String,
        field: String,
        expected: String,
    },

    /// No rebuilder is registered for the requested kind.
    #[error("Unknown kind: {0}")]
    UnknownKind(Kind),

    /// A resolved instance is not of the Rust type the caller asked for.
    #[error("Kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: Kind, found: Kind },

    /// Materialization went deeper than the configured limit.
    #[error("Materialization depth exceeded limit of {limit}")]
    DepthExceeded { limit: usize },

    /// An identity was requested again while it was still being rebuilt.
    #[error("Reconstruction cycle through identity {0}")]
    ReconstructionCycle(Uid),

    /// The dedup invariant was violated: an identity was registered twice.
    #[error("Identity already registered in session: {0}")]
    DuplicateIdentity(Uid),

    /// A rebuilder returned without producing an instance.
    #[error("Rebuild of {0} produced nothing")]
    EmptyRebuild(Kind),

    /// A live instance is already mutably borrowed.
    #[error("Instance of {0} is busy")]
    InstanceBusy(Kind),

    /// A copy failed; the partial session was discarded.
    #[error("Failed to clone {kind}: {source}")]
    CloneFailed {
        kind: Kind,
        #[source]
        source: Box<FeaError>,
    },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
