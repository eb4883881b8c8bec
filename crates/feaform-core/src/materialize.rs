//! # Materialization Wrapper
//!
//! The envelope every rebuild runs inside:
//!
//! 1. **Short-circuit**: an identity already registered in the session
//!    returns the registered instance before any work is done. This is what
//!    makes two references to one identity resolve to one instance.
//! 2. **Guards**: the nesting depth is capped, and an identity that is asked
//!    for again while its own rebuild is still on the stack is a genuine
//!    reconstruction cycle. Both fail closed.
//! 3. **Rebuild**: the kind's rebuilder runs (or the keyword fallback, for
//!    kinds without one) and may recurse through the session.
//! 4. **Identity**: PRESERVE copies the input token and display name onto the
//!    new instance; FRESH keeps the constructor-minted token and suffixes the
//!    display name. Position key and owner annotation are copied under both.
//! 5. **Register**: exactly once, after rebuild has fully returned, under
//!    the *input* token.
//!
//! Registration after construction supports shared DAG references; a true
//! construction-time cycle is reported as [`FeaError::ReconstructionCycle`].

use crate::catalog::Rebuilder;
use crate::entity::Instance;
use crate::record::Record;
use crate::session::Session;
use crate::{FeaError, Form, Kind, Policy, Uid};

impl Session<'_> {
    /// Run the wrapper for `form` as `kind`.
    ///
    /// `rebuilder` is `None` for kinds without one; the form is then turned
    /// into a [`Record`] holding every field as given.
    pub(crate) fn materialize_with(
        &mut self,
        kind: &Kind,
        form: &Form,
        rebuilder: Option<&Rebuilder>,
    ) -> Result<Instance, FeaError> {
        let identity = form.identity()?;

        if let Some(id) = &identity {
            if let Some(existing) = self.lookup(id) {
                tracing::trace!(%id, %kind, "dedup short-circuit");
                return Ok(existing);
            }
            if self.in_flight.contains(id) {
                return Err(FeaError::ReconstructionCycle(id.clone()));
            }
        }

        let limit = self.engine.config().max_depth;
        if self.depth >= limit {
            return Err(FeaError::DepthExceeded { limit });
        }

        self.depth += 1;
        if let Some(id) = &identity {
            self.in_flight.push(id.clone());
        }

        let built = self.build(kind, form, rebuilder);

        if identity.is_some() {
            self.in_flight.pop();
        }
        self.depth -= 1;

        let instance = built?;
        self.assign_identity(&instance, form, identity.as_ref())?;

        if let Some(id) = identity {
            self.register(id, instance.clone())?;
        }
        Ok(instance)
    }

    fn build(
        &mut self,
        kind: &Kind,
        form: &Form,
        rebuilder: Option<&Rebuilder>,
    ) -> Result<Instance, FeaError> {
        match rebuilder {
            Some(rebuild) => {
                rebuild(form, self)?.ok_or_else(|| FeaError::EmptyRebuild(kind.clone()))
            }
            None => Ok(Instance::new(Record::from_form(kind.clone(), form))),
        }
    }

    fn assign_identity(
        &self,
        instance: &Instance,
        form: &Form,
        identity: Option<&Uid>,
    ) -> Result<(), FeaError> {
        let display_name = form.display_name()?;
        let position_key = form.position_key()?;
        let owner = form.owner_ref()?;
        let policy = self.policy;
        let suffix = self.engine.config().copy_suffix.as_str();

        instance.with_header_mut(|header| {
            match policy {
                Policy::Preserve => {
                    if let Some(id) = identity {
                        header.identity = id.clone();
                    }
                    if let Some(name) = display_name {
                        header.display_name = name;
                    }
                }
                Policy::Fresh => {
                    if let Some(name) = display_name {
                        header.display_name = format!("{}{}", name, suffix);
                    }
                }
            }
            header.position_key = position_key;
            header.owner = owner;
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::model::Node;
    use crate::{Catalog, Engine, EngineConfig, FeaError, Form, Kind, Policy, Record, Uid};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn node_form(identity: &str, name: &str) -> Form {
        Form::from_value(json!({
            "type": "Node",
            "location": "fea.model.nodes",
            "identity": identity,
            "display_name": name,
            "position_key": 4,
            "owner_ref": ["Part", "p1"],
            "xyz": [1.0, 2.0, 3.0]
        }))
        .expect("object")
    }

    #[test]
    fn preserve_keeps_token_and_name() {
        let engine = Engine::standard();
        let mut session = engine.session(Policy::Preserve);

        let node = session
            .resolve_typed::<Node>(&node_form("n1", "corner"))
            .expect("resolve");
        let node = node.borrow();

        assert_eq!(node.header.identity, Uid::new("n1"));
        assert_eq!(node.header.display_name, "corner");
        assert_eq!(node.header.position_key, Some(4));
        assert_eq!(
            node.header.owner.as_ref().map(|o| o.identity.as_str()),
            Some("p1")
        );
    }

    #[test]
    fn fresh_mints_token_and_suffixes_name() {
        let engine = Engine::standard();
        let mut session = engine.session(Policy::Fresh);

        let node = session
            .resolve_typed::<Node>(&node_form("n1", "corner"))
            .expect("resolve");
        let node = node.borrow();

        assert_ne!(node.header.identity, Uid::new("n1"));
        assert_eq!(node.header.display_name, "corner_copy");
        // registered under the input token
        assert!(session.lookup(&Uid::new("n1")).is_some());
    }

    #[test]
    fn copy_suffix_comes_from_config() {
        let config = EngineConfig {
            copy_suffix: ".dup".to_string(),
            ..EngineConfig::default()
        };
        let engine = Engine::new(Catalog::standard(), config);
        let mut session = engine.session(Policy::Fresh);

        let node = session
            .resolve_typed::<Node>(&node_form("n1", "corner"))
            .expect("resolve");

        assert_eq!(node.borrow().header.display_name, "corner.dup");
    }

    #[test]
    fn short_circuit_skips_rebuild() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let kind = Kind::new("test", "Counted");

        let mut catalog = Catalog::new();
        catalog.register_with(kind.clone(), move |form, _session| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(crate::Instance::new(Record::from_form(
                Kind::new("test", "Counted"),
                form,
            ))))
        });
        let engine = Engine::new(catalog, EngineConfig::default());
        let mut session = engine.session(Policy::Preserve);
        let form = Form::from_value(json!({
            "type": "Counted", "location": "test", "identity": "c1"
        }))
        .expect("object");

        let first = session.materialize(&kind, &form).expect("first");
        let second = session.materialize(&kind, &form).expect("second");

        assert!(first.ptr_eq(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_rebuild_is_an_error() {
        let kind = Kind::new("test", "Hollow");
        let mut catalog = Catalog::new();
        catalog.register_with(kind.clone(), |_, _| Ok(None));
        let engine = Engine::new(catalog, EngineConfig::default());
        let mut session = engine.session(Policy::Preserve);
        let form = Form::from_value(json!({
            "type": "Hollow", "location": "test", "identity": "h1"
        }))
        .expect("object");

        let result = session.materialize(&kind, &form);

        assert!(matches!(result, Err(FeaError::EmptyRebuild(k)) if k == kind));
        assert!(session.is_empty());
    }

    #[test]
    fn construction_cycle_fails_closed() {
        // a rebuilder that asks for its own identity before returning
        let kind = Kind::new("test", "Ouroboros");
        let mut catalog = Catalog::new();
        catalog.register_with(kind.clone(), |form, session| {
            let tail = form.nested("tail")?;
            session.resolve(&tail).map(Some)
        });
        let engine = Engine::new(catalog, EngineConfig::default());
        let mut session = engine.session(Policy::Preserve);
        let inner = json!({"type": "Ouroboros", "location": "test", "identity": "o1"});
        let form = Form::from_value(json!({
            "type": "Ouroboros", "location": "test", "identity": "o1", "tail": inner
        }))
        .expect("object");

        let result = session.materialize(&kind, &form);

        assert!(matches!(result, Err(FeaError::ReconstructionCycle(id)) if id.as_str() == "o1"));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let config = EngineConfig {
            max_depth: 3,
            ..EngineConfig::default()
        };
        let kind = Kind::new("test", "Chain");
        let mut catalog = Catalog::new();
        catalog.register_with(kind.clone(), |form, session| match form.nested_optional("next")? {
            Some(next) => session.resolve(&next).map(Some),
            None => Ok(Some(crate::Instance::new(Record::from_form(
                Kind::new("test", "Chain"),
                form,
            )))),
        });
        let engine = Engine::new(catalog, config);

        let mut chain = json!({"type": "Chain", "location": "test"});
        for _ in 0..5 {
            chain = json!({"type": "Chain", "location": "test", "next": chain});
        }
        let form = Form::from_value(chain).expect("object");
        let mut session = engine.session(Policy::Preserve);

        assert!(matches!(
            session.materialize(&kind, &form),
            Err(FeaError::DepthExceeded { limit: 3 })
        ));
    }

    #[test]
    fn fallback_registers_only_with_identity() {
        let engine = Engine::standard();
        let mut session = engine.session(Policy::Preserve);
        let anonymous = Form::from_value(json!({
            "type": "Gravity", "location": "fea.problem.loads", "g": 9.81
        }))
        .expect("object");
        let named = anonymous.clone().with("identity", "g1");

        let record = session.resolve(&anonymous).expect("fallback");
        assert!(session.is_empty());
        assert_eq!(record.kind(), Kind::new("fea.problem.loads", "Gravity"));

        session.resolve(&named).expect("fallback");
        assert_eq!(session.len(), 1);
    }
}
