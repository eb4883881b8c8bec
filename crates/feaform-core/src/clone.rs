//! # Clone Service
//!
//! Copies built from describe + materialize:
//!
//! 1. Snapshot the root's form. `describe` returns an owned tree, so the
//!    snapshot shares no storage with the live graph.
//! 2. Open a new session.
//! 3. Materialize the snapshot as the root's kind under the caller's policy.
//!
//! Any failure in step 3 is reported as [`FeaError::CloneFailed`] naming the
//! root kind. The partial session is dropped with the error.

use crate::entity::{Instance, Materialize, Shared};
use crate::{Engine, FeaError, Kind, Policy};

impl Engine {
    /// Clone `root` under `policy`.
    pub fn clone_instance(&self, root: &Instance, policy: Policy) -> Result<Instance, FeaError> {
        let kind = root.kind();
        let snapshot = root.describe();
        tracing::debug!(%kind, ?policy, "cloning instance");

        let mut session = self.session(policy);
        session
            .materialize(&kind, &snapshot)
            .and_then(|instance| session.finish().map(|()| instance))
            .map_err(|source| FeaError::CloneFailed {
                kind,
                source: Box::new(source),
            })
    }

    /// Clone a typed value under `policy`.
    pub fn clone_typed<T: Materialize>(&self, root: &T, policy: Policy) -> Result<Shared<T>, FeaError> {
        let kind = Kind::of::<T>();
        let snapshot = root.describe();

        let mut session = self.session(policy);
        session
            .materialize(&kind, &snapshot)
            .and_then(|instance| session.finish().map(|()| instance))
            .and_then(|instance| instance.downcast_or_mismatch::<T>())
            .map_err(|source| FeaError::CloneFailed {
                kind,
                source: Box::new(source),
            })
    }

    /// Public copy facade.
    ///
    /// `preserve_identity = false` yields an independent duplicate with new
    /// identities; `true` yields a faithful copy carrying the same tokens.
    pub fn copy(&self, root: &Instance, preserve_identity: bool) -> Result<Instance, FeaError> {
        self.clone_instance(root, Policy::from_preserve(preserve_identity))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Node, Part, Section, Material};
    use std::rc::Rc;

    fn sample_part() -> Part {
        let steel = Material::shared(210e9, 0.3, 7850.0);
        let section = Section::shared(0.01, steel);
        let a = Node::shared([0.0, 0.0, 0.0]);
        let b = Node::shared([1.0, 0.0, 0.0]);
        let mut part = Part::new("frame");
        part.add_element(Element::shared(vec![a, b], Some(section)));
        part
    }

    #[test]
    fn fresh_copy_has_new_identities_and_same_shape() {
        let engine = Engine::standard();
        let part = sample_part();

        let copy = engine.clone_typed(&part, Policy::Fresh).expect("clone");
        let copy = copy.borrow();

        assert_ne!(copy.header.identity, part.header.identity);
        assert_eq!(copy.header.display_name, "frame_copy");
        let element = copy.elements()[0].borrow();
        assert!(Rc::ptr_eq(&element.nodes()[0], &copy.nodes()[0]));
        assert!(Rc::ptr_eq(&element.nodes()[1], &copy.nodes()[1]));
    }

    #[test]
    fn fresh_copy_relinks_owner_annotations() {
        let engine = Engine::standard();
        let part = sample_part();

        let copy = engine.clone_typed(&part, Policy::Fresh).expect("clone");
        let copy = copy.borrow();

        let node = copy.nodes()[0].borrow();
        let owner = node.header.owner.as_ref().expect("owner annotation");
        assert_eq!(owner.identity, copy.header.identity);
    }

    #[test]
    fn preserve_copy_carries_same_identities() {
        let engine = Engine::standard();
        let part = Instance::new(sample_part());

        let copy = engine.copy(&part, true).expect("copy");

        assert!(!copy.ptr_eq(&part));
        assert_eq!(copy.header().identity, part.header().identity);
        assert_eq!(copy.describe(), part.describe());
    }

    #[test]
    fn failures_are_reported_as_clone_failures() {
        // an engine that does not know parts cannot clone one
        let engine = Engine::new(crate::Catalog::new(), crate::EngineConfig::default());
        let part = Instance::new(sample_part());

        let result = engine.copy(&part, false);

        assert!(matches!(
            result,
            Err(FeaError::CloneFailed { kind, source })
                if kind.name == "Part" && matches!(*source, FeaError::UnknownKind(_))
        ));
    }
}
