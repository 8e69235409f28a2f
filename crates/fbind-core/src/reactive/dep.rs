#![forbid(unsafe_code)]

//! Ordered subscriber list for a single reactive property.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Registration is unconditional: an effect that reads the same property
//!    twice while collecting is registered (and later notified) twice.
//! 3. Notification is synchronous. The first failing update aborts the pass;
//!    effects registered after it are not run.
//!
//! Subscribers are held as `Weak` references. The compiled template owns its
//! effects; once an effect is dropped its entry is pruned during the next
//! notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::effect::{EffectId, ReactiveEffect};
use crate::error::Result;

/// Subscribers of one [`PropertyCell`](super::PropertyCell).
#[derive(Default)]
pub struct DependencySet {
    subscribers: RefCell<Vec<Weak<ReactiveEffect>>>,
}

impl DependencySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `effect`. O(1), no deduplication.
    pub fn register(&self, effect: &Rc<ReactiveEffect>) {
        self.subscribers.borrow_mut().push(Rc::downgrade(effect));
    }

    /// Run `update()` on every live subscriber in registration order.
    ///
    /// The subscriber list is snapshotted first, so effects registered while
    /// the pass runs are not visited until the next write.
    pub fn notify_all(&self) -> Result<()> {
        let live: Vec<Rc<ReactiveEffect>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(subscribers = live.len(), "notify pass");

        for (position, effect) in live.iter().enumerate() {
            if let Err(err) = effect.update() {
                tracing::debug!(
                    effect = effect.id().get(),
                    path = %effect.key_path(),
                    skipped = live.len() - position - 1,
                    error = %err,
                    "notify pass aborted"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Number of registrations, including dead ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.borrow().is_empty()
    }

    /// Ids of live subscribers in registration order (duplicates kept).
    #[must_use]
    pub fn subscriber_ids(&self) -> Vec<EffectId> {
        self.subscribers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|e| e.id())
            .collect()
    }
}

impl fmt::Debug for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencySet")
            .field("subscriber_count", &self.len())
            .finish()
    }
}
