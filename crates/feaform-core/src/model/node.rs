//! Mesh nodes.

use crate::entity::{Entity, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::cell::RefCell;
use std::rc::Rc;

/// A point of the mesh in global coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub header: Header,
    xyz: [f64; 3],
}

impl Node {
    #[must_use]
    pub fn new(xyz: [f64; 3]) -> Self {
        Self {
            header: Header::new(Self::TYPE_NAME),
            xyz,
        }
    }

    #[must_use]
    pub fn shared(xyz: [f64; 3]) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(xyz)))
    }

    #[must_use]
    pub fn xyz(&self) -> [f64; 3] {
        self.xyz
    }

    pub fn set_xyz(&mut self, xyz: [f64; 3]) {
        self.xyz = xyz;
    }
}

impl Entity for Node {
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
        form.insert("xyz", self.xyz.to_vec());
    }
}

impl Materialize for Node {
    const LOCATION: &'static str = "fea.model.nodes";
    const TYPE_NAME: &'static str = "Node";

    fn rebuild(form: &Form, _session: &mut Session<'_>) -> Result<Self, FeaError> {
        Ok(Self::new(form.decode("xyz")?))
    }
}
