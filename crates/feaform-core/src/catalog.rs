//! # Type Catalog
//!
//! The explicit `(location, type) -> rebuilder` table the session consults
//! for polymorphic dispatch.
//!
//! A catalog is an ordinary value: it is populated once, then lent to every
//! session opened from the owning [`crate::Engine`]. Nothing registers itself
//! at load time.

use crate::entity::{Instance, Materialize};
use crate::session::Session;
use crate::{FeaError, Form, Kind};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Type-erased rebuilder.
///
/// Returns `Ok(None)` when it produced nothing; the wrapper turns that into
/// [`FeaError::EmptyRebuild`].
pub type Rebuilder =
    Arc<dyn Fn(&Form, &mut Session<'_>) -> Result<Option<Instance>, FeaError> + Send + Sync>;

/// Registry of rebuilders keyed by kind.
#[derive(Clone, Default)]
pub struct Catalog {
    rebuilders: BTreeMap<Kind, Rebuilder>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding every standard CAE record kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        crate::model::register_standard(&mut catalog);
        catalog
    }

    /// Register the typed rebuilder of `T`.
    ///
    /// Registering a kind again replaces the earlier rebuilder.
    pub fn register<T: Materialize>(&mut self) -> &mut Self {
        let rebuilder: Rebuilder = Arc::new(typed_rebuilder::<T>);
        self.rebuilders.insert(Kind::of::<T>(), rebuilder);
        self
    }

    /// Register an erased rebuilder for `kind`.
    pub fn register_with<F>(&mut self, kind: Kind, rebuilder: F) -> &mut Self
    where
        F: Fn(&Form, &mut Session<'_>) -> Result<Option<Instance>, FeaError>
            + Send
            + Sync
            + 'static,
    {
        self.rebuilders.insert(kind, Arc::new(rebuilder));
        self
    }

    /// Look up the rebuilder of `kind`.
    #[must_use]
    pub fn rebuilder(&self, kind: &Kind) -> Option<Rebuilder> {
        self.rebuilders.get(kind).cloned()
    }

    /// Is `kind` registered?
    #[must_use]
    pub fn contains(&self, kind: &Kind) -> bool {
        self.rebuilders.contains_key(kind)
    }

    /// All registered kinds, sorted by location then name.
    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.rebuilders.keys()
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rebuilders.len()
    }

    /// Is the catalog empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rebuilders.is_empty()
    }
}

fn typed_rebuilder<T: Materialize>(
    form: &Form,
    session: &mut Session<'_>,
) -> Result<Option<Instance>, FeaError> {
    T::rebuild(form, session).map(|value| Some(Instance::new(value)))
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("kinds", &self.rebuilders.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
