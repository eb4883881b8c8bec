//! # Model Root
//!
//! The top of a CAE model graph: metadata, parts, and the problems analysed
//! on them. Parts are rebuilt before problems, so loads that point at part
//! nodes short-circuit onto the nodes the parts already created.

use super::{Part, Problem, annotate, holds};
use crate::entity::{Entity, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::rc::Rc;

/// The root of a CAE model: parts plus the problems analysed on them.
#[derive(Debug, Clone)]
pub struct Model {
    pub header: Header,
    pub description: Option<String>,
    pub author: Option<String>,
    parts: Vec<Shared<Part>>,
    problems: Vec<Shared<Problem>>,
}

impl Model {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: Header::named(name),
            description: None,
            author: None,
            parts: Vec::new(),
            problems: Vec::new(),
        }
    }

    #[must_use]
    pub fn parts(&self) -> &[Shared<Part>] {
        &self.parts
    }

    #[must_use]
    pub fn problems(&self) -> &[Shared<Problem>] {
        &self.problems
    }

    pub fn add_part(&mut self, part: Shared<Part>) -> Shared<Part> {
        if !holds(&self.parts, &part) {
            annotate(&part, Self::TYPE_NAME, &self.header.identity, self.parts.len());
            self.parts.push(Rc::clone(&part));
        }
        part
    }

    pub fn add_problem(&mut self, problem: Shared<Problem>) -> Shared<Problem> {
        if !holds(&self.problems, &problem) {
            annotate(
                &problem,
                Self::TYPE_NAME,
                &self.header.identity,
                self.problems.len(),
            );
            self.problems.push(Rc::clone(&problem));
        }
        problem
    }
}

impl Entity for Model {
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
        form.insert("author", self.author.clone());
        form.insert_forms("parts", self.parts.iter().map(|p| p.borrow().describe()));
        form.insert_forms(
            "problems",
            self.problems.iter().map(|p| p.borrow().describe()),
        );
    }
}

impl Materialize for Model {
    const LOCATION: &'static str = "fea.model";
    const TYPE_NAME: &'static str = "Model";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        // parts first: problems refer to nodes the parts own
        let parts = session.resolve_list::<Part>(form, "parts")?;
        let problems = session.resolve_list::<Problem>(form, "problems")?;
        Ok(Self {
            header: Header::new(Self::TYPE_NAME),
            description: form.decode_optional("description")?,
            author: form.decode_optional("author")?,
            parts,
            problems,
        })
    }
}
