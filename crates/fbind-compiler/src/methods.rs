#![forbid(unsafe_code)]

//! Named event handlers available to `on` directives.

use std::collections::BTreeMap;
use std::fmt;

use fbind_backend::Listener;
use fbind_core::{BindError, Result};

/// Handler name → listener, with receivers already bound.
pub struct MethodTable<E> {
    methods: BTreeMap<String, Listener<E>>,
}

impl<E> Default for MethodTable<E> {
    fn default() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }
}

impl<E> MethodTable<E> {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, listener: Listener<E>) {
        self.methods.insert(name.into(), listener);
    }

    /// Look up a handler. The name is trimmed first.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Listener<E>> {
        self.methods.get(name.trim())
    }

    /// Look up a handler, failing with [`BindError::MissingHandler`].
    pub fn resolve(&self, name: &str) -> Result<Listener<E>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| BindError::MissingHandler(name.trim().to_owned()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<E> fmt::Debug for MethodTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn resolve_trims_and_reports_missing() {
        let mut table: MethodTable<()> = MethodTable::new();
        table.insert("save", Rc::new(|_: &()| Ok(())));
        assert!(table.resolve(" save ").is_ok());
        assert_eq!(
            table.resolve("load").err(),
            Some(BindError::MissingHandler("load".into()))
        );
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["save"]);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
        assert_eq!(format!("{table:?}"), "{\"save\"}");
    }
}
