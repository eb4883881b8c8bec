//! # Serialized Form
//!
//! The passive, tree-shaped, string-keyed wire value an entity produces to
//! describe its minimal reconstructable state.
//!
//! Every form carries the header keys (`type`, `location`, `identity`,
//! `display_name`, `position_key`, `owner_ref`) followed by kind-specific
//! fields. A nested value denoting another entity is itself a complete form.
//!
//! Optional header keys that are absent are read as `null`, so forms written
//! with nulls stripped load unchanged.

use crate::primitives::{
    HEADER_KEYS, KEY_DISPLAY_NAME, KEY_IDENTITY, KEY_LOCATION, KEY_OWNER_REF, KEY_POSITION_KEY,
    KEY_TYPE,
};
use crate::{FeaError, Header, Kind, OwnerRef, Uid};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder used in error messages for forms without a readable `type`.
const UNTYPED: &str = "<untyped>";

/// A serialized entity description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Form(Map<String, Value>);

impl Form {
    /// Start a form for an entity of `kind` with the given header.
    #[must_use]
    pub fn new(kind: &Kind, header: &Header) -> Self {
        let mut map = Map::new();
        map.insert(KEY_TYPE.to_string(), Value::from(kind.name.as_str()));
        map.insert(KEY_LOCATION.to_string(), Value::from(kind.location.as_str()));
        map.insert(
            KEY_IDENTITY.to_string(),
            Value::from(header.identity.as_str()),
        );
        map.insert(
            KEY_DISPLAY_NAME.to_string(),
            Value::from(header.display_name.as_str()),
        );
        map.insert(
            KEY_POSITION_KEY.to_string(),
            header.position_key.map_or(Value::Null, Value::from),
        );
        map.insert(
            KEY_OWNER_REF.to_string(),
            header.owner.as_ref().map_or(Value::Null, |owner| {
                Value::Array(vec![
                    Value::from(owner.kind.as_str()),
                    Value::from(owner.identity.as_str()),
                ])
            }),
        );
        Self(map)
    }

    /// Wrap a JSON value. The value must be an object.
    pub fn from_value(value: Value) -> Result<Self, FeaError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FeaError::MalformedForm(format!(
                "expected an object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Wrap a JSON object.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Unwrap into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    // =========================================================================
    // HEADER ACCESS
    // =========================================================================

    /// The `type` string, or a placeholder when it is absent.
    ///
    /// Only meant for diagnostics; use [`Form::kind`] for dispatch.
    #[must_use]
    pub fn type_label(&self) -> &str {
        self.0
            .get(KEY_TYPE)
            .and_then(Value::as_str)
            .unwrap_or(UNTYPED)
    }

    /// The kind declared by `type` and `location`. Both are required.
    pub fn kind(&self) -> Result<Kind, FeaError> {
        let name = self.header_str(KEY_TYPE)?;
        let location = self.header_str(KEY_LOCATION)?;
        Ok(Kind::new(location, name))
    }

    /// The identity token, if any.
    pub fn identity(&self) -> Result<Option<Uid>, FeaError> {
        self.optional_str(KEY_IDENTITY)
            .map(|token| token.map(Uid::new))
    }

    /// The display name, if any.
    pub fn display_name(&self) -> Result<Option<String>, FeaError> {
        self.optional_str(KEY_DISPLAY_NAME)
            .map(|name| name.map(str::to_string))
    }

    /// The position key, if any.
    pub fn position_key(&self) -> Result<Option<u64>, FeaError> {
        match self.get(KEY_POSITION_KEY) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.invalid(KEY_POSITION_KEY, "a non-negative integer")),
        }
    }

    /// The owner annotation, if any.
    pub fn owner_ref(&self) -> Result<Option<OwnerRef>, FeaError> {
        self.decode_optional(KEY_OWNER_REF)
    }

    // =========================================================================
    // FIELD ACCESS
    // =========================================================================

    /// Get a field. `null` reads as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Get a field that must be present and non-null.
    pub fn require(&self, key: &str) -> Result<&Value, FeaError> {
        self.get(key).ok_or_else(|| FeaError::MissingField {
            kind: self.type_label().to_string(),
            field: key.to_string(),
        })
    }

    /// Decode a required field.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T, FeaError> {
        let value = self.require(key)?;
        T::deserialize(value).map_err(|e| self.invalid(key, &e.to_string()))
    }

    /// Decode an optional field.
    pub fn decode_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FeaError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| self.invalid(key, &e.to_string())),
        }
    }

    /// A required nested entity form.
    pub fn nested(&self, key: &str) -> Result<Form, FeaError> {
        let value = self.require(key)?;
        self.nested_value(key, value)
    }

    /// An optional nested entity form.
    pub fn nested_optional(&self, key: &str) -> Result<Option<Form>, FeaError> {
        self.get(key)
            .map(|value| self.nested_value(key, value))
            .transpose()
    }

    /// A required list of nested entity forms.
    pub fn nested_list(&self, key: &str) -> Result<Vec<Form>, FeaError> {
        let items = self
            .require(key)?
            .as_array()
            .ok_or_else(|| self.invalid(key, "a list of forms"))?;
        items
            .iter()
            .map(|value| self.nested_value(key, value))
            .collect()
    }

    /// Kind-specific fields, i.e. everything except the header keys.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0
            .iter()
            .filter(|(key, _)| !HEADER_KEYS.contains(&key.as_str()))
    }

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Insert or replace a field.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Builder-style [`Form::insert`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a nested entity form.
    pub fn insert_form(&mut self, key: &str, form: Form) {
        self.0.insert(key.to_string(), form.into_value());
    }

    /// Insert a nested entity form or `null`.
    pub fn insert_optional_form(&mut self, key: &str, form: Option<Form>) {
        self.0
            .insert(key.to_string(), form.map_or(Value::Null, Form::into_value));
    }

    /// Insert a list of nested entity forms.
    pub fn insert_forms(&mut self, key: &str, forms: impl IntoIterator<Item = Form>) {
        let items = forms.into_iter().map(Form::into_value).collect();
        self.0.insert(key.to_string(), Value::Array(items));
    }

    /// Drop every null-valued key, recursively through nested objects and
    /// lists.
    pub fn strip_nulls(&mut self) {
        strip_map(&mut self.0);
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    fn header_str(&self, key: &str) -> Result<&str, FeaError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Err(FeaError::MalformedForm(format!(
                "form is missing required '{}' key",
                key
            ))),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(FeaError::MalformedForm(format!(
                "'{}' must be a string, found {}",
                key,
                json_type_name(other)
            ))),
        }
    }

    fn optional_str(&self, key: &str) -> Result<Option<&str>, FeaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    fn nested_value(&self, key: &str, value: &Value) -> Result<Form, FeaError> {
        value
            .as_object()
            .map(|map| Form(map.clone()))
            .ok_or_else(|| self.invalid(key, "a nested form"))
    }

    fn invalid(&self, key: &str, expected: &str) -> FeaError {
        FeaError::InvalidField {
            kind: self.type_label().to_string(),
            field: key.to_string(),
            expected: expected.to_string(),
        }
    }
}

impl From<Form> for Value {
    fn from(form: Form) -> Self {
        form.into_value()
    }
}

fn strip_map(map: &mut Map<String, Value>) {
    map.retain(|_, value| !value.is_null());
    for value in map.values_mut() {
        strip_value(value);
    }
}

fn strip_value(value: &mut Value) {
    match value {
        Value::Object(map) => strip_map(map),
        Value::Array(items) => items.iter_mut().for_each(strip_value),
        _ => {}
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// TESTS
// =============================================================================
