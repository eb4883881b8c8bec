//! # Engine Primitives
//!
//! Hardcoded constants for the feaform engine: the reserved header keys of
//! the wire format and the default resource limits.

// =============================================================================
// WIRE FORMAT KEYS
// =============================================================================

/// Concrete type name of the described entity.
pub const KEY_TYPE: &str = "type";

/// Logical location of the type, so a reader can find its rebuilder.
pub const KEY_LOCATION: &str = "location";

/// String-encoded identity token.
pub const KEY_IDENTITY: &str = "identity";

/// Human-readable display name.
pub const KEY_DISPLAY_NAME: &str = "display_name";

/// Position of the entity inside its owner.
pub const KEY_POSITION_KEY: &str = "position_key";

/// `null` or `[owner_type, owner_identity]`.
pub const KEY_OWNER_REF: &str = "owner_ref";

/// All header keys, in the order they are written.
pub const HEADER_KEYS: [&str; 6] = [
    KEY_TYPE,
    KEY_LOCATION,
    KEY_IDENTITY,
    KEY_DISPLAY_NAME,
    KEY_POSITION_KEY,
    KEY_OWNER_REF,
];

// =============================================================================
// DEFAULTS
// =============================================================================

/// Suffix appended to display names of independent duplicates.
pub const COPY_SUFFIX: &str = "_copy";

/// Maximum nesting depth of a single materialization.
///
/// Recursion follows the depth of the input graph, so it is capped to keep
/// hostile or corrupted input from exhausting the call stack.
///
/// Applies to forms built in memory. Forms read from text are bounded first
/// by [`MAX_DOCUMENT_NESTING`].
pub const MAX_MATERIALIZE_DEPTH: usize = 256;

/// Maximum JSON nesting of a persisted document (the `serde_json` parser
/// limit).
///
/// A nested form in a field costs one level, a nested form inside a list
/// costs two (list + object). A file therefore holds at most 127 entity
/// levels linked through fields, or 63 linked through lists, even though
/// such graphs materialize and save fine in memory.
pub const MAX_DOCUMENT_NESTING: usize = 128;

/// Maximum size of a persisted document (256 MB).
///
/// Validated before parsing.
pub const MAX_DOCUMENT_SIZE: usize = 256 * 1024 * 1024;
