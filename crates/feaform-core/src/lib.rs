//! # feaform-core
//!
//! Identity-preserving materialization of interlinked CAE records.
//!
//! Every record kind can *describe* itself as a self-describing JSON
//! [`Form`] and be *rebuilt* from one. The engine solves, once and
//! generically:
//! - polymorphic reconstruction: the concrete kind of a nested value is read
//!   from the form and dispatched through a [`Catalog`]
//! - reference deduplication: a [`Session`] maps each identity token to one
//!   live instance, so shared children stay shared
//! - cycle tolerance: owner back-references are annotations, never pointers
//! - dual identity semantics: [`Policy::Preserve`] for faithful round-trips,
//!   [`Policy::Fresh`] for independent duplicates
//!
//! ## Layout
//!
//! ```text
//! types ─► form ─► entity ─► catalog ─► session ─► materialize ─► clone
//!                                          ▲                        │
//!                                        engine ◄───────────────────┘
//! formats (JSON files)          model (standard CAE kinds)
//! ```
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous; a session never crosses threads
//! - No I/O inside the resolver; files are handled by `formats`
//! - Recursion depth is capped by [`EngineConfig::max_depth`]

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod clone;
pub mod config;
pub mod engine;
pub mod entity;
pub mod form;
pub mod formats;
pub mod materialize;
pub mod model;
pub mod primitives;
pub mod record;
pub mod session;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{FeaError, Header, Kind, OwnerRef, Policy, Uid};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::{Catalog, Rebuilder};
pub use config::EngineConfig;
pub use engine::Engine;
pub use entity::{Entity, Instance, Materialize, Shared};
pub use form::Form;
pub use record::Record;
pub use session::Session;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SaveFormat, form_from_str, form_to_string, save, save_form};
