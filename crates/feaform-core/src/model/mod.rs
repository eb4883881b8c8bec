//! # Standard CAE Record Kinds
//!
//! The record kinds of a CAE model plugged into the engine: materials,
//! sections, nodes, elements, parts, the model itself, and the analysis
//! problem with its steps and loads.
//!
//! Ownership follows the model hierarchy (a Part owns its Nodes and
//! Elements). Cross references are shared handles: an Element holds clones of
//! the handles of the Nodes it connects, so after a rebuild the Node in the
//! Part and the Node in the Element are one allocation.
//!
//! Membership operations (`add_*`) annotate the member with `owner_ref` and
//! `position_key`. Rebuilders never call them; the materialization wrapper
//! restores those annotations from the form.

mod element;
mod fe_model;
mod material;
mod node;
mod part;
mod problem;
mod section;

pub use element::Element;
pub use fe_model::Model;
pub use material::Material;
pub use node::Node;
pub use part::Part;
pub use problem::{PointLoad, Problem, Step};
pub use section::Section;

use crate::entity::{Entity, Shared};
use crate::{Catalog, OwnerRef, Uid};

/// Register every standard kind in `catalog`.
pub fn register_standard(catalog: &mut Catalog) {
    catalog
        .register::<Material>()
        .register::<Section>()
        .register::<Node>()
        .register::<Element>()
        .register::<Part>()
        .register::<Model>()
        .register::<Problem>()
        .register::<Step>()
        .register::<PointLoad>();
}

/// Annotate `member` as the `position`-th member of the owner.
fn annotate<T: Entity>(member: &Shared<T>, owner_type: &str, owner: &Uid, position: usize) {
    let mut member = member.borrow_mut();
    let header = member.header_mut();
    header.owner = Some(OwnerRef::new(owner_type, owner.clone()));
    header.position_key = Some(position as u64);
}

/// Does `members` already hold this exact allocation?
fn holds<T>(members: &[Shared<T>], candidate: &Shared<T>) -> bool {
    members
        .iter()
        .any(|member| std::rc::Rc::ptr_eq(member, candidate))
}
