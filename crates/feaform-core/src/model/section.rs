//! Beam cross-sections.

use super::Material;
use crate::entity::{Entity, Materialize, Shared};
use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::cell::RefCell;
use std::rc::Rc;

/// Beam cross-section made of a shared material.
#[derive(Debug, Clone)]
pub struct Section {
    pub header: Header,
    pub area: f64,
    material: Shared<Material>,
}

impl Section {
    #[must_use]
    pub fn new(area: f64, material: Shared<Material>) -> Self {
        Self {
            header: Header::new(Self::TYPE_NAME),
            area,
            material,
        }
    }

    #[must_use]
    pub fn shared(area: f64, material: Shared<Material>) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(area, material)))
    }

    #[must_use]
    pub fn material(&self) -> &Shared<Material> {
        &self.material
    }
}

impl Entity for Section {
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
        form.insert("area", self.area);
        form.insert_form("material", self.material.borrow().describe());
    }
}

impl Materialize for Section {
    const LOCATION: &'static str = "fea.model.sections";
    const TYPE_NAME: &'static str = "BeamSection";

    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError> {
        let area = form.decode("area")?;
        let material = session.resolve_field::<Material>(form, "material")?;
        Ok(Self::new(area, material))
    }
}
