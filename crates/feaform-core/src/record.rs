//! # Plain Records
//!
//! The reduced-fidelity value a form becomes when its kind has no rebuilder:
//! the header plus every other field kept verbatim.
//!
//! Nested forms inside a record stay plain JSON. They are never resolved, so
//! records take no part in dedup beyond their own identity.

use crate::entity::Entity;
use crate::{Form, Header, Kind};
use serde_json::{Map, Value};

/// An inert value of a kind the catalog does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: Kind,
    header: Header,
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record from its parts.
    #[must_use]
    pub fn new(kind: Kind, header: Header, fields: Map<String, Value>) -> Self {
        Self {
            kind,
            header,
            fields,
        }
    }

    /// Keyword construction: take every non-header field of `form` as is.
    ///
    /// The header starts fresh; the materialization wrapper fills it in.
    #[must_use]
    pub fn from_form(kind: Kind, form: &Form) -> Self {
        let fields = form
            .fields()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let header = Header::new(&kind.name);
        Self::new(kind, header, fields)
    }

    /// Get a field by name.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Entity for Record {
    fn kind(&self) -> Kind {
        self.kind.clone()
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn describe_fields(&self, form: &mut Form) {
        for (key, value) in &self.fields {
            form.insert(key, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_form_keeps_every_field() {
        let form = Form::from_value(json!({
            "type": "Gravity",
            "location": "fea.problem.loads",
            "identity": "g1",
            "g": 9.81,
            "direction": [0, 0, -1]
        }))
        .expect("object");

        let record = Record::from_form(form.kind().expect("kind"), &form);

        assert_eq!(record.fields().len(), 2);
        assert_eq!(record.field("g"), Some(&json!(9.81)));
        assert_eq!(record.field("identity"), None);
    }

    #[test]
    fn describe_round_trips_fields() {
        let form = Form::from_value(json!({
            "type": "Gravity",
            "location": "fea.problem.loads",
            "direction": [0, 0, -1]
        }))
        .expect("object");
        let record = Record::from_form(form.kind().expect("kind"), &form);

        let described = record.describe();

        assert_eq!(described.get("direction"), form.get("direction"));
        assert_eq!(described.kind().expect("kind"), record.kind());
    }
}
