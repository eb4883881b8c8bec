//! Linear elastic isotropic material.

use crate::entity::{Entity, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::cell::RefCell;
use std::rc::Rc;

/// Linear elastic, isotropic material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub header: Header,
    /// Young's modulus.
    pub e: f64,
    /// Poisson's ratio.
    pub v: f64,
    pub density: f64,
}

impl Material {
    #[must_use]
    pub fn new(e: f64, v: f64, density: f64) -> Self {
        Self {
            header: Header::new(Self::TYPE_NAME),
            e,
            v,
            density,
        }
    }

    #[must_use]
    pub fn shared(e: f64, v: f64, density: f64) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(e, v, density)))
    }
}

impl Entity for Material {
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
        form.insert("E", self.e);
        form.insert("v", self.v);
        form.insert("density", self.density);
    }
}

impl Materialize for Material {
    const LOCATION: &'static str = "fea.model.materials";
    const TYPE_NAME: &'static str = "ElasticIsotropic";

    fn rebuild(form: &Form, _session: &mut Session<'_>) -> Result<Self, FeaError> {
        Ok(Self::new(
            form.decode("E")?,
            form.decode("v")?,
            form.decode("density")?,
        ))
    }
}
