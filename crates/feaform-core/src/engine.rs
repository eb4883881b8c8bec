//! # Engine
//!
//! Owns the [`Catalog`] and the [`EngineConfig`] and opens sessions on them.
//!
//! Every top-level call (`materialize`, `copy`, `load`) opens a private
//! session, runs to completion, and drops the session before returning, so no
//! partially registered state escapes a failed call.

use crate::entity::{Instance, Materialize, Shared};
use crate::session::Session;
use crate::{Catalog, EngineConfig, FeaError, Form, Kind, Policy};

/// The materialization engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine from a populated catalog and a config.
    #[must_use]
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Engine with the standard CAE catalog and default config.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Catalog::standard(), EngineConfig::default())
    }

    /// The type catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a resolution session under `policy`.
    #[must_use]
    pub fn session(&self, policy: Policy) -> Session<'_> {
        Session::new(self, policy)
    }

    /// Materialize `form` as `kind` in a fresh session.
    pub fn materialize(
        &self,
        kind: &Kind,
        form: &Form,
        policy: Policy,
    ) -> Result<Instance, FeaError> {
        let mut session = self.session(policy);
        let instance = session.materialize(kind, form)?;
        session.finish()?;
        Ok(instance)
    }

    /// Materialize `form` as `T` in a fresh session.
    pub fn materialize_typed<T: Materialize>(
        &self,
        form: &Form,
        policy: Policy,
    ) -> Result<Shared<T>, FeaError> {
        self.materialize(&Kind::of::<T>(), form, policy)?
            .downcast_or_mismatch::<T>()
    }
}
