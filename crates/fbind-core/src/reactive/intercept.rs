#![forbid(unsafe_code)]

//! Conversion of plain JSON data into the reactive graph.
//!
//! Interception walks the data bottom-up: each property's value is converted
//! before the property's own cell is created, so by the time a cell exists
//! its value is already reactive. Leaves are stored as-is.
//!
//! A reactive container can only be produced by interception, and writing a
//! container handle stores it without re-converting, so no mapping is ever
//! wrapped twice.

use super::container::{Mapping, Sequence};
use crate::error::{BindError, Result};
use crate::value::Value;

/// Convert plain JSON into a [`Value`], making every object and array reactive.
#[must_use]
pub fn intercept(plain: serde_json::Value) -> Value {
    match plain {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Sequence(intercept_array(items)),
        serde_json::Value::Object(map) => Value::Mapping(intercept_object(map)),
    }
}

/// Intercept a model root, which must be a JSON object.
pub fn intercept_root(plain: serde_json::Value) -> Result<Mapping> {
    match plain {
        serde_json::Value::Object(map) => Ok(intercept_object(map)),
        other => Err(BindError::InvalidModel(intercept(other).kind_name())),
    }
}

fn intercept_object(map: serde_json::Map<String, serde_json::Value>) -> Mapping {
    let mapping = Mapping::new();
    for (key, value) in map {
        let value = intercept(value);
        mapping.define(key, value);
    }
    mapping
}

fn intercept_array(items: Vec<serde_json::Value>) -> Sequence {
    let sequence = Sequence::new();
    for item in items {
        sequence.push(intercept(item));
    }
    sequence
}
