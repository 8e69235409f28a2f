#![forbid(unsafe_code)]

//! Render target abstraction for FrankenBind.
//!
//! FrankenBind never creates, stores, or paints nodes itself. The host
//! environment (a browser DOM binding, a retained-mode widget tree, the
//! in-memory tree in `fbind-harness`) implements [`RenderTarget`] and the
//! template compiler drives it through these capabilities only:
//!
//! | Capability | Methods |
//! |------------|---------|
//! | tree navigation | [`node_kind`](RenderTarget::node_kind), [`children`](RenderTarget::children), [`take_children`](RenderTarget::take_children), [`append_children`](RenderTarget::append_children), [`query_selector`](RenderTarget::query_selector) |
//! | element | [`attributes`](RenderTarget::attributes), [`set_attribute`](RenderTarget::set_attribute), [`remove_attribute`](RenderTarget::remove_attribute), [`add_event_listener`](RenderTarget::add_event_listener) |
//! | text | [`text_content`](RenderTarget::text_content), [`set_text_content`](RenderTarget::set_text_content), [`set_inner_html`](RenderTarget::set_inner_html) |
//! | input | [`input_value`](RenderTarget::input_value), [`set_input_value`](RenderTarget::set_input_value), [`event_value`](RenderTarget::event_value) |
//!
//! # Reentrancy
//!
//! Every method takes `&self`. A fired listener writes the model, the write
//! notifies effects, and the effects write back into the same target, all on
//! one call stack. Implementations must therefore not hold interior borrows
//! across listener invocation.

use std::fmt;
use std::rc::Rc;

pub use fbind_core::{BindError, Result};

/// Discriminates the node shapes the compiler cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Carries attributes and children.
    Element,
    /// Carries textual content only.
    Text,
    /// Anything else (comments, processing instructions). Skipped.
    Other,
}

/// An event listener. `Err` aborts the operation that fired the event.
pub type Listener<E> = Rc<dyn Fn(&E) -> Result<()>>;

/// Host-provided UI tree.
pub trait RenderTarget: 'static {
    /// Handle to a node. Cloning must not clone the node itself.
    type Node: Clone + fmt::Debug + 'static;
    /// Event payload delivered to listeners.
    type Event: 'static;

    /// Shape of `node`.
    fn node_kind(&self, node: &Self::Node) -> NodeKind;

    /// First-level children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Detach and return every child of `node`, in order.
    fn take_children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Append `children` to `node` as one operation.
    fn append_children(&self, node: &Self::Node, children: Vec<Self::Node>);

    /// Resolve a selector string to a node.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Attributes of an element as `(name, value)` pairs, in document order.
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    /// Value of a single attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String> {
        self.attributes(node)
            .into_iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Set (or overwrite) an attribute.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute if present.
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    /// Attach `listener` for events of `event_type` on `node`.
    fn add_event_listener(&self, node: &Self::Node, event_type: &str, listener: Listener<Self::Event>);

    /// Textual content of `node` (concatenated for elements).
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace the content of `node` with plain text.
    fn set_text_content(&self, node: &Self::Node, text: &str);

    /// Replace the children of `node` with parsed `markup`. No escaping.
    fn set_inner_html(&self, node: &Self::Node, markup: &str);

    /// Current value of an input-like node.
    fn input_value(&self, node: &Self::Node) -> String;

    /// Set the current value of an input-like node.
    fn set_input_value(&self, node: &Self::Node, value: &str);

    /// The value carried by an input-style event, if any.
    fn event_value(&self, event: &Self::Event) -> Option<String>;
}

/// Where a view model mounts: a node handle or a selector to resolve.
#[derive(Clone, PartialEq, Eq)]
pub enum MountPoint<N> {
    /// An already-resolved node.
    Node(N),
    /// A selector passed to [`RenderTarget::query_selector`].
    Selector(String),
}

impl<N> MountPoint<N> {
    /// Resolve against `target`.
    pub fn resolve<T>(&self, target: &T) -> Result<N>
    where
        T: RenderTarget<Node = N>,
        N: Clone,
    {
        match self {
            Self::Node(node) => Ok(node.clone()),
            Self::Selector(selector) => target
                .query_selector(selector)
                .ok_or_else(|| BindError::MountNotFound(selector.clone())),
        }
    }
}

impl<N> From<&str> for MountPoint<N> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl<N> From<String> for MountPoint<N> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl<N: fmt::Debug> fmt::Debug for MountPoint<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Selector(s) => f.debug_tuple("Selector").field(s).finish(),
        }
    }
}
