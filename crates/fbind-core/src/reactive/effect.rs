#![forbid(unsafe_code)]

//! Reactive effects: re-computations bound to a key path.
//!
//! # Lifecycle
//!
//! 1. **Construction** pushes the effect onto the collection stack, resolves
//!    the key path against the model root (every property read on the way
//!    registers the effect), then pops. The value read is kept as
//!    [`last_value`](ReactiveEffect::last_value) so callers can render it
//!    without a second read.
//! 2. **Update** is invoked by a [`DependencySet`](super::DependencySet)
//!    when a property the effect read changes. It re-resolves the path with
//!    collection suspended and passes the result to the callback.
//!
//! # Invariants
//!
//! 1. Dependencies are collected exactly once, during construction.
//! 2. By default every update invokes the callback, even when the re-read
//!    value equals the previous one. [`EffectOptions::gate_on_change`] opts
//!    into skipping strictly-equal values.
//! 3. Effect ids are unique for the lifetime of the process.
//!
//! # Failure Modes
//!
//! - Path fault during construction: the error is returned and the partially
//!   registered effect is dropped; its weak registrations are pruned later.
//! - Path fault or callback error during update: returned to the notifying
//!   write, aborting the rest of that notification pass.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::container::Mapping;
use super::tracking;
use crate::error::Result;
use crate::path::{KeyPath, get_value};
use crate::value::Value;

/// Global counter for unique effect ids.
static EFFECT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a [`ReactiveEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

impl EffectId {
    fn next() -> Self {
        Self(EFFECT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Callback receiving the freshly re-read value.
pub type EffectCallback = Box<dyn Fn(&Value) -> Result<()>>;

/// Per-effect behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectOptions {
    /// Skip the callback when the re-read value is strictly equal to the
    /// last value delivered. Off by default.
    pub gate_on_change: bool,
}

/// A unit of re-computation bound to a key path of a model root.
pub struct ReactiveEffect {
    id: EffectId,
    path: KeyPath,
    root: Mapping,
    callback: EffectCallback,
    options: EffectOptions,
    last_value: RefCell<Value>,
    updates: Cell<u64>,
}

impl ReactiveEffect {
    /// Create an effect with default options and collect its dependencies.
    pub fn new(
        path: &str,
        root: &Mapping,
        callback: impl Fn(&Value) -> Result<()> + 'static,
    ) -> Result<Rc<Self>> {
        Self::with_options(path, root, EffectOptions::default(), callback)
    }

    /// Create an effect and collect its dependencies.
    pub fn with_options(
        path: &str,
        root: &Mapping,
        options: EffectOptions,
        callback: impl Fn(&Value) -> Result<()> + 'static,
    ) -> Result<Rc<Self>> {
        let path = KeyPath::parse(path);
        let effect = Rc::new(Self {
            id: EffectId::next(),
            path,
            root: root.clone(),
            callback: Box::new(callback),
            options,
            last_value: RefCell::new(Value::Null),
            updates: Cell::new(0),
        });

        let initial = tracking::collect(&effect, || get_value(&effect.path, &effect.root))?;
        *effect.last_value.borrow_mut() = initial;

        tracing::trace!(effect = effect.id.get(), path = %effect.path, "effect created");
        Ok(effect)
    }

    /// Re-read the key path and invoke the callback.
    pub fn update(&self) -> Result<()> {
        let value = tracking::untracked(|| get_value(&self.path, &self.root))?;
        if self.options.gate_on_change && value.strict_eq(&self.last_value.borrow()) {
            tracing::trace!(effect = self.id.get(), "update gated: value unchanged");
            return Ok(());
        }
        *self.last_value.borrow_mut() = value.clone();
        self.updates.set(self.updates.get() + 1);
        (self.callback)(&value)
    }

    /// This effect's id.
    #[must_use]
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// The key path this effect resolves.
    #[must_use]
    pub fn key_path(&self) -> &KeyPath {
        &self.path
    }

    /// The options this effect was built with.
    #[must_use]
    pub fn options(&self) -> EffectOptions {
        self.options
    }

    /// The value produced by the most recent read (initial or update).
    #[must_use]
    pub fn last_value(&self) -> Value {
        self.last_value.borrow().clone()
    }

    /// How many times the callback has run.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates.get()
    }
}

impl fmt::Debug for ReactiveEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveEffect")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("options", &self.options)
            .field("updates", &self.updates.get())
            .finish_non_exhaustive()
    }
}
