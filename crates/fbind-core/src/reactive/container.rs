#![forbid(unsafe_code)]

//! Reactive containers: [`Mapping`] (keyed) and [`Sequence`] (indexed).
//!
//! Both are shared handles over a list of [`PropertyCell`]s. Cloning a handle
//! shares the same cells; identity ([`Mapping::ptr_eq`]) is what strict
//! equality compares.
//!
//! # Invariants
//!
//! 1. One cell per key (or index), created when the key is first written or
//!    intercepted. Cells live as long as the container.
//! 2. `read` registers the collecting effect with the key's cell; a missing
//!    key registers nothing and reads as `None`.
//! 3. Only per-key writes notify. Adding a key or growing a sequence is not
//!    observed by anyone.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::cell::PropertyCell;
use crate::error::Result;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Reactive string-keyed container. Keys enumerate in insertion order.
#[derive(Clone, Default)]
pub struct Mapping {
    cells: Rc<RefCell<IndexMap<String, Rc<PropertyCell>>>>,
}

impl Mapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key with its initial value. Used during interception; does
    /// not notify.
    pub(crate) fn define(&self, key: impl Into<String>, value: Value) {
        self.cells
            .borrow_mut()
            .insert(key.into(), Rc::new(PropertyCell::new(value)));
    }

    /// The cell backing `key`, if defined.
    #[must_use]
    pub fn cell(&self, key: &str) -> Option<Rc<PropertyCell>> {
        self.cells.borrow().get(key).cloned()
    }

    /// Tracked read of `key`.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<Value> {
        self.cell(key).map(|cell| cell.get())
    }

    /// Untracked read of `key`.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.cell(key).map(|cell| cell.peek())
    }

    /// Write `key`. Existing keys go through the cell's change check and
    /// notify on change; a new key is defined silently.
    pub fn write(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self.cell(key) {
            Some(cell) => cell.set(value).map(|_| ()),
            None => {
                self.define(key, value);
                Ok(())
            }
        }
    }

    /// Whether `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.borrow().contains_key(key)
    }

    /// Keys in enumeration order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.cells.borrow().keys().cloned().collect()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    /// Whether the mapping has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }

    /// Whether both handles refer to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }

    /// Untracked JSON snapshot.
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        let cells: Vec<(String, Rc<PropertyCell>)> = self
            .cells
            .borrow()
            .iter()
            .map(|(k, c)| (k.clone(), Rc::clone(c)))
            .collect();
        let map = cells
            .into_iter()
            .map(|(k, c)| (k, c.peek().to_plain()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("keys", &self.keys())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Reactive index-keyed container.
///
/// Each existing index is a reactive property. The length is not: `push`
/// and append-by-assignment notify nobody.
#[derive(Clone, Default)]
pub struct Sequence {
    cells: Rc<RefCell<Vec<Rc<PropertyCell>>>>,
}

impl Sequence {
    /// Create an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell backing `index`, if in range.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Rc<PropertyCell>> {
        self.cells.borrow().get(index).cloned()
    }

    /// Tracked read of `index`.
    #[must_use]
    pub fn read(&self, index: usize) -> Option<Value> {
        self.cell(index).map(|cell| cell.get())
    }

    /// Untracked read of `index`.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<Value> {
        self.cell(index).map(|cell| cell.peek())
    }

    /// Write an existing index. Returns `Ok(false)` when `index` is out of
    /// range (nothing is written).
    pub fn write(&self, index: usize, value: impl Into<Value>) -> Result<bool> {
        match self.cell(index) {
            Some(cell) => cell.set(value.into()).map(|_| true),
            None => Ok(false),
        }
    }

    /// Append a new element. Not observed.
    pub fn push(&self, value: impl Into<Value>) {
        self.cells
            .borrow_mut()
            .push(Rc::new(PropertyCell::new(value.into())));
    }

    /// Current element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    /// Whether the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }

    /// Whether both handles refer to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }

    /// Untracked JSON snapshot.
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        let cells: Vec<Rc<PropertyCell>> = self.cells.borrow().clone();
        serde_json::Value::Array(cells.iter().map(|c| c.peek().to_plain()).collect())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence").field("len", &self.len()).finish()
    }
}
