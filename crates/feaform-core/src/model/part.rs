//! # Parts
//!
//! A Part owns its nodes and elements. `add_element` pulls the element's
//! nodes into the part, so the node list is always a superset of the nodes
//! any element connects.

use super::{Element, Node, annotate, holds};
use crate::entity::{Entity, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::cell::RefCell;
use std::rc::Rc;

/// A meshed part: the owner of its nodes and elements.
#[derive(Debug, Clone)]
pub struct Part {
    pub header: Header,
    nodes: Vec<Shared<Node>>,
    elements: Vec<Shared<Element>>,
}

impl Part {
    /// Create an empty part.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: Header::named(name),
            nodes: Vec::new(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn shared(name: impl Into<String>) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(name)))
    }

    #[must_use]
    pub fn nodes(&self) -> &[Shared<Node>] {
        &self.nodes
    }

    #[must_use]
    pub fn elements(&self) -> &[Shared<Element>] {
        &self.elements
    }

    /// Add a node, annotating it with this part as owner.
    ///
    /// Adding the same allocation twice is a no-op.
    pub fn add_node(&mut self, node: Shared<Node>) -> Shared<Node> {
        if !holds(&self.nodes, &node) {
            annotate(&node, Self::TYPE_NAME, &self.header.identity, self.nodes.len());
            self.nodes.push(Rc::clone(&node));
        }
        node
    }

    /// Add an element and every node it connects.
    pub fn add_element(&mut self, element: Shared<Element>) -> Shared<Element> {
        let connected: Vec<_> = element.borrow().nodes().to_vec();
        for node in connected {
            self.add_node(node);
        }
        if !holds(&self.elements, &element) {
            annotate(
                &element,
                Self::TYPE_NAME,
                &self.header.identity,
                self.elements.len(),
            );
            self.elements.push(Rc::clone(&element));
        }
        element
    }
}

impl Entity for Part {
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
        form.insert_forms(
            "elements",
            self.elements.iter().map(|e| e.borrow().describe()),
        );
    }
}

impl Materialize for Part {
    const LOCATION: &'static str = "fea.model.parts";
    const TYPE_NAME: &'static str = "Part";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        let nodes = session.resolve_list::<Node>(form, "nodes")?;
        let elements = session.resolve_list::<Element>(form, "elements")?;
        Ok(Self {
            header: Header::new(Self::TYPE_NAME),
            nodes,
            elements,
        })
    }
}
