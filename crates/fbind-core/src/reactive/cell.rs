#![forbid(unsafe_code)]

//! Per-property state: the captured value plus its subscribers.

use std::cell::RefCell;
use std::fmt;

use super::dep::DependencySet;
use super::tracking;
use crate::error::Result;
use crate::value::Value;

/// Captured value and owned [`DependencySet`] for one key of a container.
///
/// [`get`](Self::get) and [`set`](Self::set) are the read/write accessor
/// pair: reads register the collecting effect, writes of a strictly
/// different value notify every registered effect before returning.
pub struct PropertyCell {
    value: RefCell<Value>,
    deps: DependencySet,
}

impl PropertyCell {
    pub(crate) fn new(value: Value) -> Self {
        Self {
            value: RefCell::new(value),
            deps: DependencySet::new(),
        }
    }

    /// Read the value, registering the collecting effect if there is one.
    #[must_use]
    pub fn get(&self) -> Value {
        tracking::register_read(&self.deps);
        self.value.borrow().clone()
    }

    /// Read the value without registering anything.
    #[must_use]
    pub fn peek(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replace the value and notify subscribers.
    ///
    /// Returns `Ok(false)` without notifying when `value` is strictly equal
    /// to the captured value. The new value is stored before notification,
    /// so a failing subscriber does not roll the write back.
    pub fn set(&self, value: Value) -> Result<bool> {
        {
            let mut current = self.value.borrow_mut();
            if current.strict_eq(&value) {
                return Ok(false);
            }
            *current = value;
        }
        self.deps.notify_all()?;
        Ok(true)
    }

    /// Subscribers of this property.
    #[must_use]
    pub fn dependencies(&self) -> &DependencySet {
        &self.deps
    }
}

impl fmt::Debug for PropertyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCell")
            .field("value", &*self.value.borrow())
            .field("deps", &self.deps)
            .finish()
    }
}
