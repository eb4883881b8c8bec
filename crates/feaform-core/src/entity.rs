//! # Entity Capability
//!
//! The pair every domain record exposes: *describe* (produce a [`Form`],
//! recursing into children) and *rebuild* (consume a form plus a
//! [`Session`], producing a live value).
//!
//! Live entities are shared through [`Shared<T>`] handles. A container that
//! refers to a child it does not own holds a clone of the child's handle, so
//! two containers pointing at one identity point at one allocation.
//! [`Instance`] is the type-erased handle the session stores.

use crate::session::Session;
use crate::{FeaError, Form, Header, Kind};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, mutable handle to a live entity of a known type.
pub type Shared<T> = Rc<RefCell<T>>;

// =============================================================================
// ENTITY TRAIT
// =============================================================================

/// A domain record participating in the identity-preserving protocol.
pub trait Entity: Any + fmt::Debug {
    /// The concrete kind of this entity.
    fn kind(&self) -> Kind;

    /// Identity, display name, position key and owner annotation.
    fn header(&self) -> &Header;

    /// Mutable access to the header. Used by the materialization wrapper.
    fn header_mut(&mut self) -> &mut Header;

    /// Write the kind-specific fields into `form`.
    ///
    /// Entity-valued fields must be written as complete nested forms.
    fn describe_fields(&self, form: &mut Form);

    /// Produce the complete serialized form of this entity.
    ///
    /// Pure: no side effects on `self` or on any child.
    ///
    /// JSON has no NaN or infinity: a non-finite `f64` is written as `null`.
    /// Rebuilding that form fails on the field, with
    /// [`FeaError::MissingField`] for a scalar and [`FeaError::InvalidField`]
    /// for an array element. Graphs that must round-trip keep their
    /// floating-point state finite.
    fn describe(&self) -> Form {
        let mut form = Form::new(&self.kind(), self.header());
        self.describe_fields(&mut form);
        form
    }
}

/// Entities that can be rebuilt from their form.
///
/// Implementors are registered in a [`crate::Catalog`] under
/// `(LOCATION, TYPE_NAME)`. `rebuild` is only ever invoked through the
/// materialization wrapper, which applies identity, display name and header
/// annotations after it returns.
pub trait Materialize: Entity + Sized {
    /// Logical location of the kind.
    const LOCATION: &'static str;
    /// Type name of the kind.
    const TYPE_NAME: &'static str;

    /// Construct a fully-initialized value from `form`, resolving nested
    /// entities through `session`.
    ///
    /// Must fail with a structural error when a required field is absent.
    fn rebuild(form: &Form, session: &mut Session<'_>) -> Result<Self, FeaError>;
}

// =============================================================================
// INSTANCE
// =============================================================================

/// Type-erased handle to a live entity.
///
/// Cloning an `Instance` clones the handle, not the entity.
#[derive(Clone)]
pub struct Instance {
    entity: Rc<RefCell<dyn Entity>>,
    any: Rc<dyn Any>,
}

impl Instance {
    /// Move a value into a fresh shared allocation.
    #[must_use]
    pub fn new<T: Entity>(value: T) -> Self {
        Self::from_shared(Rc::new(RefCell::new(value)))
    }

    /// Erase the type of an existing shared handle.
    #[must_use]
    pub fn from_shared<T: Entity>(shared: Shared<T>) -> Self {
        Self {
            entity: shared.clone(),
            any: shared,
        }
    }

    /// Recover the typed handle, if the entity is a `T`.
    #[must_use]
    pub fn downcast<T: Entity>(&self) -> Option<Shared<T>> {
        Rc::clone(&self.any).downcast::<RefCell<T>>().ok()
    }

    /// Recover the typed handle or report the mismatch.
    pub fn downcast_or_mismatch<T: Materialize>(&self) -> Result<Shared<T>, FeaError> {
        self.downcast::<T>().ok_or_else(|| FeaError::KindMismatch {
            expected: Kind::of::<T>(),
            found: self.kind(),
        })
    }

    /// Reference identity: do both handles point at the same allocation?
    #[must_use]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.any, &other.any)
    }

    /// The concrete kind of the entity.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.entity.borrow().kind()
    }

    /// A copy of the entity's header.
    #[must_use]
    pub fn header(&self) -> Header {
        self.entity.borrow().header().clone()
    }

    /// Describe the entity.
    #[must_use]
    pub fn describe(&self) -> Form {
        self.entity.borrow().describe()
    }

    /// Mutate the header, failing if the entity is borrowed elsewhere.
    pub fn with_header_mut<R>(&self, f: impl FnOnce(&mut Header) -> R) -> Result<R, FeaError> {
        let mut entity = self.entity.try_borrow_mut().map_err(|_| {
            FeaError::InstanceBusy(
                self.entity
                    .try_borrow()
                    .map(|e| e.kind())
                    .unwrap_or_else(|_| Kind::new("", "<borrowed>")),
            )
        })?;
        Ok(f(entity.header_mut()))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity.try_borrow() {
            Ok(entity) => fmt::Debug::fmt(&*entity, f),
            Err(_) => f.write_str("Instance(<borrowed>)"),
        }
    }
}

impl<T: Entity> From<Shared<T>> for Instance {
    fn from(shared: Shared<T>) -> Self {
        Self::from_shared(shared)
    }
}

// =============================================================================
// TESTS
// =============================================================================
