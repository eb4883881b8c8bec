//! # Resolution Session
//!
//! The ephemeral map from identity token to already-materialized instance.
//!
//! A session is the dedup authority and the dispatch authority of one
//! top-level rebuild or clone call:
//! - `lookup` / `register` maintain the dedup table
//! - `resolve` finds the rebuilder of a nested form by its kind and runs it
//!   through the materialization wrapper, threading the session through so
//!   the whole graph shares one table
//!
//! Sessions are single-threaded and never outlive the call that opened them.

use crate::catalog::Rebuilder;
use crate::entity::{Instance, Materialize, Shared};
use crate::engine::Engine;
use crate::{FeaError, Form, Kind, Policy, Uid};
use std::collections::HashMap;

/// One resolution session.
#[derive(Debug)]
pub struct Session<'e> {
    /// The engine whose catalog and config this session uses.
    pub(crate) engine: &'e Engine,
    /// Identity policy applied to every instance built in this session.
    pub(crate) policy: Policy,
    /// Dedup table: input identity -> live instance.
    pub(crate) registry: HashMap<Uid, Instance>,
    /// Identities whose rebuild has started but not returned.
    pub(crate) in_flight: Vec<Uid>,
    /// Current materialization nesting depth.
    pub(crate) depth: usize,
}

impl<'e> Session<'e> {
    /// Open a session on `engine` under `policy`.
    #[must_use]
    pub fn new(engine: &'e Engine, policy: Policy) -> Self {
        tracing::debug!(?policy, "opening resolution session");
        Self {
            engine,
            policy,
            registry: HashMap::new(),
            in_flight: Vec::new(),
            depth: 0,
        }
    }

    /// The identity policy of this session.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// The engine this session was opened on.
    #[must_use]
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    // =========================================================================
    // DEDUP TABLE
    // =========================================================================

    /// Look up the instance registered under `identity`.
    #[must_use]
    pub fn lookup(&self, identity: &Uid) -> Option<Instance> {
        self.registry.get(identity).cloned()
    }

    /// Register `instance` under `identity`.
    ///
    /// Fails if the identity is already present: a second registration means
    /// the dedup short-circuit was bypassed upstream.
    pub fn register(&mut self, identity: Uid, instance: Instance) -> Result<(), FeaError> {
        if self.registry.contains_key(&identity) {
            return Err(FeaError::DuplicateIdentity(identity));
        }
        tracing::trace!(%identity, "registered instance");
        self.registry.insert(identity, instance);
        Ok(())
    }

    /// Number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Is the dedup table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // =========================================================================
    // DYNAMIC DISPATCH
    // =========================================================================

    /// Resolve a nested form to a live instance.
    ///
    /// The kind is read from the form's `type` and `location`. Kinds without a
    /// rebuilder degrade to a plain [`crate::Record`].
    pub fn resolve(&mut self, form: &Form) -> Result<Instance, FeaError> {
        let kind = form.kind()?;
        self.resolve_as(form, &kind)
    }

    /// Resolve a nested form as the declared `kind`, ignoring the form's own
    /// `type` and `location` for dispatch.
    pub fn resolve_as(&mut self, form: &Form, kind: &Kind) -> Result<Instance, FeaError> {
        let rebuilder = self.engine.catalog().rebuilder(kind);
        if rebuilder.is_none() {
            tracing::debug!(%kind, "no rebuilder registered; using keyword fallback");
        }
        self.materialize_with(kind, form, rebuilder.as_ref())
    }

    /// Resolve a nested form and downcast it to `T`.
    pub fn resolve_typed<T: Materialize>(&mut self, form: &Form) -> Result<Shared<T>, FeaError> {
        self.resolve(form)?.downcast_or_mismatch::<T>()
    }

    /// Resolve the required nested form under `key`.
    pub fn resolve_field<T: Materialize>(
        &mut self,
        form: &Form,
        key: &str,
    ) -> Result<Shared<T>, FeaError> {
        let nested = form.nested(key)?;
        self.resolve_typed(&nested)
    }

    /// Resolve the optional nested form under `key`.
    pub fn resolve_optional_field<T: Materialize>(
        &mut self,
        form: &Form,
        key: &str,
    ) -> Result<Option<Shared<T>>, FeaError> {
        form.nested_optional(key)?
            .map(|nested| self.resolve_typed(&nested))
            .transpose()
    }

    /// Resolve the required list of nested forms under `key`, all of kind `T`.
    pub fn resolve_list<T: Materialize>(
        &mut self,
        form: &Form,
        key: &str,
    ) -> Result<Vec<Shared<T>>, FeaError> {
        form.nested_list(key)?
            .iter()
            .map(|nested| self.resolve_typed(nested))
            .collect()
    }

    /// Resolve the required list of nested forms under `key`, of any kind.
    pub fn resolve_any_list(&mut self, form: &Form, key: &str) -> Result<Vec<Instance>, FeaError> {
        form.nested_list(key)?
            .iter()
            .map(|nested| self.resolve(nested))
            .collect()
    }

    /// Materialize `form` as `kind`, which must be registered.
    ///
    /// This is the typed entry point for declared roots; nested entities go
    /// through [`Session::resolve`].
    pub fn materialize(&mut self, kind: &Kind, form: &Form) -> Result<Instance, FeaError> {
        let rebuilder: Rebuilder = self
            .engine
            .catalog()
            .rebuilder(kind)
            .ok_or_else(|| FeaError::UnknownKind(kind.clone()))?;
        self.materialize_with(kind, form, Some(&rebuilder))
    }

    // =========================================================================
    // SESSION END
    // =========================================================================

    /// Close the session.
    ///
    /// Under FRESH, owner annotations that name an identity rebuilt in this
    /// session are rewritten to that instance's new identity. The annotation
    /// stays a plain pair; no live pointer is created.
    pub fn finish(self) -> Result<(), FeaError> {
        if self.policy == Policy::Fresh {
            self.relink_owners()?;
        }
        tracing::debug!(registered = self.registry.len(), "closing resolution session");
        Ok(())
    }

    fn relink_owners(&self) -> Result<(), FeaError> {
        for instance in self.registry.values() {
            let Some(owner) = instance.header().owner else {
                continue;
            };
            let Some(rebuilt) = self.registry.get(&owner.identity) else {
                continue;
            };
            let new_identity = rebuilt.header().identity;
            instance.with_header_mut(|header| {
                if let Some(owner) = header.owner.as_mut() {
                    owner.identity = new_identity;
                }
            })?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
