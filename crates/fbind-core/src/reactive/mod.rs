#![forbid(unsafe_code)]

//! Fine-grained reactivity for FrankenBind models.
//!
//! - [`intercept`]: converts plain JSON into a reactive graph of
//!   [`Mapping`]s and [`Sequence`]s, one [`PropertyCell`] per key.
//! - [`DependencySet`]: ordered subscriber list owned by each cell.
//! - [`ReactiveEffect`]: a key-path re-computation that registers itself
//!   with every cell it reads while being constructed.
//! - [`BindingScope`]: owner of the effects of one compiled template.
//!
//! # Architecture
//!
//! Containers are `Rc<RefCell<..>>` handles; the graph is single-threaded.
//! The collecting effect lives on a thread-local stack ([`tracking`]), and
//! dependency sets hold effects weakly so that a model never keeps a
//! discarded template alive.
//!
//! # Invariants
//!
//! 1. A cell's dependency set contains exactly the effects that read the
//!    cell while they were the collecting effect, in read order, with
//!    repeats.
//! 2. A write notifies only when the new value is not strictly equal to the
//!    captured one.
//! 3. Writes notify synchronously; every effect update (and its render
//!    target write) completes before the write returns. No batching.

mod cell;
mod container;
mod dep;
mod effect;
mod intercept;
mod scope;
pub mod tracking;

pub use cell::PropertyCell;
pub use container::{Mapping, Sequence};
pub use dep::DependencySet;
pub use effect::{EffectCallback, EffectId, EffectOptions, ReactiveEffect};
pub use intercept::{intercept, intercept_root};
pub use scope::BindingScope;
