#![forbid(unsafe_code)]

//! FrankenBind public facade.
//!
//! A [`ViewModel`] intercepts a JSON model, mounts on a node of a
//! [`RenderTarget`], and compiles the node's subtree into live bindings:
//!
//! ```
//! use std::rc::Rc;
//! use fbind::prelude::*;
//! use fbind_harness::MemoryDom;
//! use serde_json::json;
//!
//! let dom = Rc::new(MemoryDom::from_markup(
//!     "<div id=\"app\"><span>{{count}}</span><input v-model=\"count\"></div>",
//! ));
//! let vm = ViewModel::new(
//!     Rc::clone(&dom),
//!     ViewModelOptions::<MemoryDom>::new().mount("#app").data(json!({"count": 0})),
//! )
//! .unwrap();
//!
//! vm.set("count", 5).unwrap();
//! let span = dom.query_selector("span").unwrap();
//! assert_eq!(dom.text_content(&span), "5");
//! ```

pub mod config;
pub mod options;
pub mod view_model;

pub use config::{ConfigError, ENV_EQUALITY_GATING, ENV_PROXY_DATA, EngineConfig};
pub use options::{Method, ViewModelOptions};
pub use view_model::ViewModel;

pub use fbind_backend::{Listener, MountPoint, NodeKind, RenderTarget};
pub use fbind_compiler::{Directive, DirectiveBinding, Interpolation, MethodTable};
pub use fbind_core::{BindError, KeyPath, Mapping, Result, Sequence, Value};

pub mod prelude {
    pub use crate::{BindError, EngineConfig, MountPoint, RenderTarget, Value, ViewModel, ViewModelOptions};

    pub use fbind_backend as backend;
    pub use fbind_compiler as compiler;
    pub use fbind_core as core;
}
