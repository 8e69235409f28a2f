#![forbid(unsafe_code)]

//! Template compilation for FrankenBind.
//!
//! Walks a [`RenderTarget`](fbind_backend::RenderTarget) subtree, resolves
//! directive attributes and `{{ }}` placeholders, and installs one reactive
//! effect per binding. The effects are returned in a
//! [`BindingScope`](fbind_core::BindingScope); the bindings stay live while
//! the scope does.
//!
//! | Directive | Effect | Listener |
//! |-----------|--------|----------|
//! | `{{ path }}` text, `v-text` | text content | |
//! | `v-html` | raw markup | |
//! | `v-model` | input value | `input` → model |
//! | `:attr`, `v-bind:attr` | attribute | |
//! | `@evt`, `v-on:evt` | | named method |

pub mod compiler;
pub mod directive;
mod handlers;
pub mod interpolation;
pub mod methods;

pub use compiler::{TemplateCompiler, compile};
pub use directive::{Directive, DirectiveBinding};
pub use interpolation::{Interpolation, Segment, contains_placeholder};
pub use methods::MethodTable;
