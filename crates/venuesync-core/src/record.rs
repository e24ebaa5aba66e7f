//! # Resource Records
//!
//! A [`Record`] is one API resource as the server sends it: a JSON object.
//! The library never forces it into a struct so that fields it does not know
//! about survive a round trip untouched.
//!
//! ## Well-Known Fields
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  _id      server-assigned, absent until the record exists server-side   │
//! │  name     stable identity key used for matching across sync runs        │
//! │  venueId  venue scoping                                                 │
//! │  owner    organization scoping                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::{ID_FIELD, NAME_FIELD};

/// A resource record: an owned JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Record(Map::new())
    }

    /// Wraps a JSON value, failing if it is not an object.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(map) => Ok(Record(map)),
            other => Err(CoreError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Converts a JSON array of objects into records.
    pub fn list_from_value(value: Value) -> CoreResult<Vec<Self>> {
        match value {
            Value::Array(items) => items.into_iter().map(Record::from_value).collect(),
            other => Err(CoreError::InvalidRecord(format!(
                "expected a JSON array, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Returns a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns true if the field is present (even if `null`).
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Sets a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Returns a string field, if present and a string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// The server-assigned identifier.
    pub fn id(&self) -> Option<&str> {
        self.str_field(ID_FIELD)
    }

    /// The record name.
    pub fn name(&self) -> Option<&str> {
        self.str_field(NAME_FIELD)
    }

    /// The venue this record belongs to.
    pub fn venue_id(&self) -> Option<&str> {
        self.str_field("venueId")
    }

    /// The owning organization.
    pub fn owner(&self) -> Option<&str> {
        self.str_field("owner")
    }

    /// The key used to match records by name.
    ///
    /// Non-string names use their JSON text; a missing name maps to the empty
    /// key, so every nameless record collapses onto one entry.
    pub fn name_key(&self) -> String {
        match self.0.get(NAME_FIELD) {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns a copy of this record carrying the given server identifier.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        let mut annotated = self.clone();
        annotated.set(ID_FIELD, id.into());
        annotated
    }

    /// Borrows the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record into its JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Consumes the record into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

impl TryFrom<Value> for Record {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Record::from_value(value)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
