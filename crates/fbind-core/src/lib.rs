#![forbid(unsafe_code)]

//! Core of FrankenBind: the reactive model that templates bind to.
//!
//! Plain JSON handed to [`intercept_root`] becomes a graph of reactive
//! containers. [`ReactiveEffect`]s resolve [`KeyPath`]s against that graph,
//! subscribing to every property they touch, and re-run synchronously when
//! one of those properties is written with a different value.
//!
//! ```
//! use fbind_core::{ReactiveEffect, Value, intercept_root};
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let model = intercept_root(json!({"user": {"name": "Ada"}})).unwrap();
//! let seen = Rc::new(RefCell::new(String::new()));
//! let sink = Rc::clone(&seen);
//! let _effect = ReactiveEffect::new("user.name", &model, move |v| {
//!     *sink.borrow_mut() = v.to_string();
//!     Ok(())
//! })
//! .unwrap();
//!
//! fbind_core::set_path("user.name", &model, "Grace").unwrap();
//! assert_eq!(*seen.borrow(), "Grace");
//! ```

pub mod error;
pub mod path;
pub mod reactive;
pub mod value;

pub use error::{BindError, Result};
pub use path::{KeyPath, get_path, get_value, set_path, set_value};
pub use reactive::{
    BindingScope, DependencySet, EffectId, EffectOptions, Mapping, PropertyCell, ReactiveEffect,
    Sequence, intercept, intercept_root,
};
pub use value::Value;
