//! Attribute-accessible records built from JSON mappings.

use std::ops::Index;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::core::TiingoError;

/// A read-only record whose fields are exactly the keys of one JSON mapping.
///
/// Fields keep the order in which the server sent them. Every field is reachable by
/// key ([`Record::get`], `record["key"]`) and by name ([`Record::attr`]); the whole
/// record can also be viewed as a typed struct with [`Record::to_struct`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: Arc<str>,
    fields: Map<String, Value>,
}

impl Record {
    pub(crate) fn new(name: Arc<str>, fields: Map<String, Value>) -> Self {
        Self { name, fields }
    }

    /// The record type name (e.g. `Ticker`, `TickerPrice`, `NewsArticle`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapping-style access; `None` if the key is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Attribute-style access; an unknown field name is an error.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] naming the record type and the missing field.
    pub fn attr(&self, field: &str) -> Result<&Value, TiingoError> {
        self.fields
            .get(field)
            .ok_or_else(|| TiingoError::Data(format!("{} has no field {field:?}", self.name)))
    }

    /// `true` if the record has a field with this name.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in first-seen order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(field, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` for a record built from an empty mapping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// View the record as a typed struct.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Json`] if the fields do not match `T`.
    pub fn to_struct<T: DeserializeOwned>(&self) -> Result<T, TiingoError> {
        Ok(T::deserialize(Value::Object(self.fields.clone()))?)
    }

    /// Give back the underlying mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// Like `serde_json::Value`, indexing a missing key yields `Null`.
    fn index(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(key).unwrap_or(&NULL)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// The object view of a response: one record for a mapping, many for a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectView {
    /// The body was a single JSON mapping.
    One(Record),
    /// The body was a list of mappings; each element keeps its own field set.
    Many(Vec<Record>),
}

impl ObjectView {
    /// Wrap a parsed JSON body, naming every record `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] if the body (or a list element) is not a mapping.
    pub fn from_value(value: Value, name: &str) -> Result<Self, TiingoError> {
        let name: Arc<str> = Arc::from(name);
        match value {
            Value::Object(map) => Ok(Self::One(Record::new(name, map))),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(Record::new(Arc::clone(&name), map)),
                    other => Err(TiingoError::Data(format!(
                        "{name}: element {i} is not a mapping: {other}"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => Err(TiingoError::Data(format!(
                "{name}: expected a mapping or a list of mappings, got {other}"
            ))),
        }
    }

    /// All records as a slice (one element for [`ObjectView::One`]).
    #[must_use]
    pub fn records(&self) -> &[Record] {
        match self {
            Self::One(r) => std::slice::from_ref(r),
            Self::Many(rs) => rs,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// `true` for an empty list body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// The single record, if this view came from a mapping.
    #[must_use]
    pub const fn as_one(&self) -> Option<&Record> {
        match self {
            Self::One(r) => Some(r),
            Self::Many(_) => None,
        }
    }
}
