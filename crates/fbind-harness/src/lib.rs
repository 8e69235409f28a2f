#![forbid(unsafe_code)]

//! Test harness for FrankenBind.
//!
//! - [`MemoryDom`]: an arena-backed [`RenderTarget`](fbind_backend::RenderTarget)
//!   with event dispatch helpers.
//! - [`markup`]: the lenient fragment parser behind `MemoryDom::from_markup`
//!   and `set_inner_html`.
//! - [`strategies`]: proptest strategies for key names and templates.
//! - [`assert_html!`]: compare the serialized markup of a node.

pub mod dom;
pub mod markup;
pub mod strategies;

pub use dom::{DomEvent, MemoryDom, NodeId};
pub use markup::{Markup, parse_fragment};

/// Assert that the outer markup of `node` equals `expected`.
///
/// ```
/// use fbind_harness::{MemoryDom, assert_html};
/// use fbind_backend::RenderTarget;
///
/// let dom = MemoryDom::from_markup("<p>hi</p>");
/// let p = dom.query_selector("p").unwrap();
/// assert_html!(dom, p, "<p>hi</p>");
/// ```
#[macro_export]
macro_rules! assert_html {
    ($dom:expr, $node:expr, $expected:expr $(,)?) => {{
        let actual = $dom.to_html($node);
        let expected: &str = $expected;
        assert!(
            actual == expected,
            "markup mismatch\n  actual:   {actual}\n  expected: {expected}"
        );
    }};
}
