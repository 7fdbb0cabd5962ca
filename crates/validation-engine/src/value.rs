//! Materialized request values
//!
//! The engine never binds raw input. The binding layer hands it a [`Value`]
//! tree where every object carries the name of its runtime type, which is what
//! the resolver chain dispatches on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

static NULL: Value = Value::Null;

/// Identity of a validatable type, as seen by the resolver chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A bound value: scalar, list or typed object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Runtime type of the value, only objects have one
    pub fn type_name(&self) -> Option<&TypeName> {
        self.as_object().map(Object::type_name)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// An object instance with its runtime type and member values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    #[serde(rename = "$type")]
    type_name: TypeName,
    #[serde(flatten)]
    members: HashMap<String, Value>,
}

impl Object {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            members: HashMap::new(),
        }
    }

    /// Builder-style member assignment
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.members.insert(name.into(), value.into());
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    /// Member value, with absent members reading as [`Value::Null`]
    pub fn member(&self, name: &str) -> &Value {
        self.members.get(name).unwrap_or(&NULL)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_member_reads_as_null() {
        let customer = Object::new("Customer").with("Name", "Ada");
        assert_eq!(customer.member("Name").as_str(), Some("Ada"));
        assert!(customer.member("Email").is_null());
        assert!(customer.get("Email").is_none());
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<i32> = None;
        assert!(Value::from(none).is_null());
        assert_eq!(Value::from(Some(4)).as_i64(), Some(4));
    }

    #[test]
    fn test_type_name_only_for_objects() {
        let order = Value::from(Object::new("Order"));
        assert_eq!(order.type_name().map(TypeName::as_str), Some("Order"));
        assert!(Value::from("text").type_name().is_none());
        assert!(Value::List(vec![]).type_name().is_none());
    }

    #[test]
    fn test_object_serializes_with_type_tag() {
        let address = Object::new("Address").with("City", "Lagos");
        let json = serde_json::to_value(Value::from(address)).unwrap();
        assert_eq!(json["$type"], "Address");
        assert_eq!(json["City"], "Lagos");
    }
}
