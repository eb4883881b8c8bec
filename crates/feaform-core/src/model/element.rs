//! # Beam Elements
//!
//! Connectivity records. An element refers to nodes owned by a Part and to
//! an optional shared section; both are shared handles, never copies.

use super::{Node, Section};
use crate::entity::{Entity, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::cell::RefCell;
use std::rc::Rc;

/// Beam element connecting shared nodes.
///
/// The nodes are owned by the Part; the element holds shared handles.
#[derive(Debug, Clone)]
pub struct Element {
    pub header: Header,
    nodes: Vec<Shared<Node>>,
    section: Option<Shared<Section>>,
}

impl Element {
    #[must_use]
    pub fn new(nodes: Vec<Shared<Node>>, section: Option<Shared<Section>>) -> Self {
        Self {
            header: Header::new(Self::TYPE_NAME),
            nodes,
            section,
        }
    }

    #[must_use]
    pub fn shared(nodes: Vec<Shared<Node>>, section: Option<Shared<Section>>) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(nodes, section)))
    }

    #[must_use]
    pub fn nodes(&self) -> &[Shared<Node>] {
        &self.nodes
    }

    #[must_use]
    pub fn section(&self) -> Option<&Shared<Section>> {
        self.section.as_ref()
    }
}

impl Entity for Element {
    fn kind(&self) -> Kind {
        Kind::of::<Self>()
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn describe_fields(&self, form: &mut Form) {
        form.insert_forms("nodes", self.nodes.iter().map(|n| n.borrow().describe()));
        form.insert_optional_form(
            "section",
            self.section.as_ref().map(|s| s.borrow().describe()),
        );
    }
}

impl Materialize for Element {
    const LOCATION: &'static str = "fea.model.elements";
    const TYPE_NAME: &'static str = "BeamElement";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        let nodes = session.resolve_list::<Node>(form, "nodes")?;
        let section = session.resolve_optional_field::<Section>(form, "section")?;
        Ok(Self::new(nodes, section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, Policy};

    #[test]
    fn rebuild_without_section_keeps_none() {
        let a = Node::shared([0.0, 0.0, 0.0]);
        let b = Node::shared([1.0, 0.0, 0.0]);
        let element = Element::new(vec![a, b], None);
        let form = element.describe();
        assert!(form.get("section").is_none());

        let rebuilt = Engine::standard()
            .materialize_typed::<Element>(&form, Policy::Preserve)
            .expect("rebuild");

        assert!(rebuilt.borrow().section().is_none());
        assert_eq!(rebuilt.borrow().nodes().len(), 2);
    }

    #[test]
    fn repeated_node_rebuilds_as_one_allocation() {
        let a = Node::shared([0.0, 0.0, 0.0]);
        let element = Element::new(vec![Rc::clone(&a), a], None);

        let rebuilt = Engine::standard()
            .materialize_typed::<Element>(&element.describe(), Policy::Preserve)
            .expect("rebuild");

        let rebuilt = rebuilt.borrow();
        assert!(Rc::ptr_eq(&rebuilt.nodes()[0], &rebuilt.nodes()[1]));
    }
}
