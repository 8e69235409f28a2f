#![forbid(unsafe_code)]

//! Ownership of the effects created for one compiled template.
//!
//! Dependency sets only hold effects weakly. A [`BindingScope`] holds them
//! strongly, so the bindings of a template stay live exactly as long as its
//! scope does.
//!
//! # Invariants
//!
//! 1. Effects are kept in creation order.
//! 2. After the scope is dropped, none of its effects run again.
//! 3. `effect_count()` and `listener_count()` are always accurate.

use std::fmt;
use std::rc::Rc;

use super::effect::ReactiveEffect;

/// Holds the effects (and counts the listeners) of a compiled template.
#[derive(Default)]
pub struct BindingScope {
    effects: Vec<Rc<ReactiveEffect>>,
    listeners: usize,
}

impl BindingScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `effect` alive for the lifetime of this scope.
    pub fn hold(&mut self, effect: Rc<ReactiveEffect>) {
        self.effects.push(effect);
    }

    /// Record that an event listener was attached on behalf of this scope.
    pub fn record_listener(&mut self) {
        self.listeners += 1;
    }

    /// Number of effects held.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Number of listeners recorded.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    /// Whether the scope holds no effects and recorded no listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.listeners == 0
    }

    /// The held effects, in creation order.
    #[must_use]
    pub fn effects(&self) -> &[Rc<ReactiveEffect>] {
        &self.effects
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("effect_count", &self.effects.len())
            .field("listener_count", &self.listeners)
            .finish()
    }
}
