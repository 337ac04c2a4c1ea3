//! Flat records: an `id`, a `parent` reference and opaque pass-through fields.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Parent value marking the root record.
pub const ROOT_SENTINEL: &str = "root";

/// Record identifier: a JSON integer or a JSON string.
///
/// Integers that fit in `i64` are always `Int`; `UInt` only holds values
/// above `i64::MAX`, so each integer has exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    Int(i64),
    UInt(u64),
    Str(String),
}

impl RecordId {
    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(RecordId::Int)
                .or_else(|| n.as_u64().map(RecordId::UInt))
                .ok_or_else(|| format!("not an integer: {}", n)),
            Value::String(s) => Ok(RecordId::Str(s.clone())),
            other => Err(format!(
                "expected integer or string, found {}",
                json_kind(other)
            )),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{}", i),
            RecordId::UInt(u) => write!(f, "{}", u),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(RecordId::Int)
            .unwrap_or(RecordId::UInt(value))
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Str(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Str(value)
    }
}

impl From<RecordId> for Value {
    fn from(value: RecordId) -> Self {
        match value {
            RecordId::Int(i) => Value::from(i),
            RecordId::UInt(u) => Value::from(u),
            RecordId::Str(s) => Value::String(s),
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordId::Int(i) => serializer.serialize_i64(*i),
            RecordId::UInt(u) => serializer.serialize_u64(*u),
            RecordId::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// Where a record hangs in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The `"root"` sentinel. Always wins over a record whose id is `"root"`.
    Root,
    Id(RecordId),
}

impl ParentRef {
    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) if s == ROOT_SENTINEL => Ok(ParentRef::Root),
            other => RecordId::from_json(other).map(ParentRef::Id),
        }
    }

    pub fn as_id(&self) -> Option<&RecordId> {
        match self {
            ParentRef::Root => None,
            ParentRef::Id(id) => Some(id),
        }
    }
}

/// One element of the flat input.
///
/// The original field map is kept verbatim (field order and explicit nulls
/// included); `id` and `parent` are parsed once at validation time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Record {
    fields: Map<String, Value>,
    id: RecordId,
    parent: ParentRef,
}

impl Record {
    /// Validates `value` as the record at position `index` of an input sequence.
    pub fn from_value(value: Value, index: usize) -> DomainResult<Self> {
        match value {
            Value::Object(fields) => Self::from_map(fields, index),
            _ => Err(DomainError::NotAnObject { index }),
        }
    }

    pub fn from_map(fields: Map<String, Value>, index: usize) -> DomainResult<Self> {
        let raw_id = fields
            .get("id")
            .ok_or(DomainError::MissingField { field: "id", index })?;
        let id = RecordId::from_json(raw_id)
            .map_err(|reason| DomainError::InvalidId { index, reason })?;

        let raw_parent = fields
            .get("parent")
            .ok_or(DomainError::MissingField { field: "parent", index })?;
        let parent = ParentRef::from_json(raw_parent)
            .map_err(|reason| DomainError::InvalidParent { index, reason })?;

        Ok(Self { fields, id, parent })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn parent(&self) -> &ParentRef {
        &self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent == ParentRef::Root
    }

    /// Any field, including `id` and `parent`, exactly as supplied.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Record::from_value(value, 0)
    }
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = DomainError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Record::from_map(fields, 0)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
