//! # Analysis Problems
//!
//! Problem -> StaticStep -> loads. A step holds loads of any kind as
//! type-erased instances; kinds the catalog does not know come back as plain
//! records.

use super::{Node, annotate, holds};
use crate::entity::{Entity, Instance, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// PROBLEM
// =============================================================================

/// An analysis problem: an ordered sequence of steps.
#[derive(Debug, Clone)]
pub struct Problem {
    pub header: Header,
    pub description: Option<String>,
    steps: Vec<Shared<Step>>,
}

impl Problem {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: Header::named(name),
            description: None,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn shared(name: impl Into<String>) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(name)))
    }

    #[must_use]
    pub fn steps(&self) -> &[Shared<Step>] {
        &self.steps
    }

    pub fn add_step(&mut self, step: Shared<Step>) -> Shared<Step> {
        if !holds(&self.steps, &step) {
            annotate(&step, Self::TYPE_NAME, &self.header.identity, self.steps.len());
            self.steps.push(Rc::clone(&step));
        }
        step
    }
}

impl Entity for Problem {
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
        form.insert("description", self.description.clone());
        form.insert_forms("steps", self.steps.iter().map(|s| s.borrow().describe()));
    }
}

impl Materialize for Problem {
    const LOCATION: &'static str = "fea.problem";
    const TYPE_NAME: &'static str = "Problem";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        let steps = session.resolve_list::<Step>(form, "steps")?;
        Ok(Self {
            header: Header::new(Self::TYPE_NAME),
            description: form.decode_optional("description")?,
            steps,
        })
    }
}

// =============================================================================
// STEP
// =============================================================================

/// A static analysis step holding loads of any kind.
///
/// Loads of kinds the catalog does not know come back as plain records.
#[derive(Debug, Clone)]
pub struct Step {
    pub header: Header,
    pub max_increments: u64,
    loads: Vec<Instance>,
}

impl Step {
    #[must_use]
    pub fn new(max_increments: u64) -> Self {
        Self {
            header: Header::new(Self::TYPE_NAME),
            max_increments,
            loads: Vec::new(),
        }
    }

    #[must_use]
    pub fn shared(max_increments: u64) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(max_increments)))
    }

    #[must_use]
    pub fn loads(&self) -> &[Instance] {
        &self.loads
    }

    /// Add a load of any kind, annotating it with this step as owner.
    ///
    /// Adding the same allocation twice is a no-op.
    pub fn add_load<T: Entity>(&mut self, load: Shared<T>) -> Instance {
        let candidate = Instance::from_shared(Rc::clone(&load));
        if let Some(held) = self.loads.iter().find(|held| held.ptr_eq(&candidate)) {
            return held.clone();
        }
        annotate(&load, Self::TYPE_NAME, &self.header.identity, self.loads.len());
        self.loads.push(candidate.clone());
        candidate
    }
}

impl Entity for Step {
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
        form.insert("max_increments", self.max_increments);
        form.insert_forms("loads", self.loads.iter().map(Instance::describe));
    }
}

impl Materialize for Step {
    const LOCATION: &'static str = "fea.problem.steps";
    const TYPE_NAME: &'static str = "StaticStep";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        let loads = session.resolve_any_list(form, "loads")?;
        Ok(Self {
            header: Header::new(Self::TYPE_NAME),
            max_increments: form.decode("max_increments")?,
            loads,
        })
    }
}

// =============================================================================
// POINT LOAD
// =============================================================================

/// Concentrated force and moment applied to one node.
#[derive(Debug, Clone)]
pub struct PointLoad {
    pub header: Header,
    node: Shared<Node>,
    pub force: [f64; 3],
    pub moment: [f64; 3],
}

impl PointLoad {
    #[must_use]
    pub fn new(node: Shared<Node>, force: [f64; 3], moment: [f64; 3]) -> Self {
        Self {
            header: Header::new(Self::TYPE_NAME),
            node,
            force,
            moment,
        }
    }

    #[must_use]
    pub fn shared(node: Shared<Node>, force: [f64; 3], moment: [f64; 3]) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(node, force, moment)))
    }

    #[must_use]
    pub fn node(&self) -> &Shared<Node> {
        &self.node
    }
}

impl Entity for PointLoad {
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
        form.insert_form("node", self.node.borrow().describe());
        form.insert("force", self.force.to_vec());
        form.insert("moment", self.moment.to_vec());
    }
}

impl Materialize for PointLoad {
    const LOCATION: &'static str = "fea.problem.loads";
    const TYPE_NAME: &'static str = "PointLoad";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        let node = session.resolve_field::<Node>(form, "node")?;
        Ok(Self::new(node, form.decode("force")?, form.decode("moment")?))
    }
}

// =============================================================================
// TESTS
// =============================================================================
