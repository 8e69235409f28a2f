#![forbid(unsafe_code)]

//! Dot-separated key paths and their resolution against a model root.
//!
//! `"person . address.city"` parses to the segments `person`, `address`,
//! `city` (each segment trimmed). Resolution is a left fold of subscript
//! reads starting at the root mapping.
//!
//! # Segment rules
//!
//! | Container | Segment | Read | Write |
//! |-----------|---------|------|-------|
//! | mapping | any key | value, or `Null` if absent | assign (defines absent keys) |
//! | sequence | canonical index `< len` | element | assign (reactive) |
//! | sequence | index `== len` | `Null` | append (unobserved) |
//! | sequence | index `> len` | `Null` | [`BindError::IndexOutOfBounds`] |
//! | sequence | `length` | element count (untracked) | [`BindError::InvalidIndex`] |
//! | sequence | anything else | `Null` | [`BindError::InvalidIndex`] |
//! | leaf or null | any | [`BindError::PathResolution`] | [`BindError::PathResolution`] |

use std::fmt;

use crate::error::{BindError, Result};
use crate::reactive::{Mapping, Sequence};
use crate::value::Value;

/// A parsed key path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse `raw`, splitting on `.` and trimming each segment.
    ///
    /// Every string parses. A blank path is the single empty key `""`, which
    /// reads as `Null` unless the model defines it.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
            segments: raw.split('.').map(|s| s.trim().to_owned()).collect(),
        }
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Trimmed segments. Never empty.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn split_leaf(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPath({:?})", self.raw)
    }
}

/// Resolve `path` against `root`. Reads are tracked.
pub fn get_value(path: &KeyPath, root: &Mapping) -> Result<Value> {
    let mut current = Value::Mapping(root.clone());
    for segment in &path.segments {
        current = read_segment(&current, segment, path)?;
    }
    Ok(current)
}

/// Assign `value` at `path` under `root`.
///
/// Every segment but the last is read (and must resolve to a container);
/// the last one is assigned.
pub fn set_value(path: &KeyPath, root: &Mapping, value: impl Into<Value>) -> Result<()> {
    let (parents, last) = path.split_leaf();
    let mut current = Value::Mapping(root.clone());
    for segment in parents {
        current = read_segment(&current, segment, path)?;
    }

    match &current {
        Value::Mapping(mapping) => mapping.write(last, value),
        Value::Sequence(sequence) => write_index(sequence, last, value.into(), path),
        other => Err(fault(path, last, other)),
    }
}

/// Convenience: parse and resolve in one step.
pub fn get_path(path: &str, root: &Mapping) -> Result<Value> {
    get_value(&KeyPath::parse(path), root)
}

/// Convenience: parse and assign in one step.
pub fn set_path(path: &str, root: &Mapping, value: impl Into<Value>) -> Result<()> {
    set_value(&KeyPath::parse(path), root, value)
}

fn read_segment(current: &Value, segment: &str, path: &KeyPath) -> Result<Value> {
    match current {
        Value::Mapping(mapping) => Ok(mapping.read(segment).unwrap_or_default()),
        Value::Sequence(sequence) => Ok(match parse_index(segment) {
            Some(index) => sequence.read(index).unwrap_or_default(),
            None if segment == "length" => Value::from(sequence.len() as f64),
            None => Value::Null,
        }),
        other => Err(fault(path, segment, other)),
    }
}

fn write_index(sequence: &Sequence, segment: &str, value: Value, path: &KeyPath) -> Result<()> {
    let index = parse_index(segment).ok_or_else(|| BindError::InvalidIndex {
        path: path.to_string(),
        segment: segment.to_owned(),
    })?;
    let len = sequence.len();
    if index < len {
        sequence.write(index, value).map(|_| ())
    } else if index == len {
        sequence.push(value);
        Ok(())
    } else {
        Err(BindError::IndexOutOfBounds {
            path: path.to_string(),
            index,
            len,
        })
    }
}

/// Canonical decimal index: digits only, no leading zeros (except `0`).
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn fault(path: &KeyPath, segment: &str, found: &Value) -> BindError {
    BindError::PathResolution {
        path: path.to_string(),
        segment: segment.to_owned(),
        found: found.kind_name(),
    }
}
