#![forbid(unsafe_code)]

//! Proptest strategies shared by the FrankenBind test suites.

use proptest::prelude::*;

/// A mapping key usable as a single key-path segment.
///
/// Never `length` and never purely numeric, so it reads the same whether the
/// container is a mapping or not.
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}".prop_filter("reserved segment", |k| k != "length")
}

/// Literal template text: no braces, no markup delimiters.
pub fn arb_literal() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.:!-]{0,12}"
}

/// One piece of a template over `keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePiece {
    Literal(String),
    /// Index into the key list, plus whether the placeholder is padded.
    Placeholder(usize, bool),
}

/// A template of literals and `{{key}}` placeholders over `key_count` keys.
pub fn arb_template(key_count: usize) -> impl Strategy<Value = Vec<TemplatePiece>> {
    let piece = prop_oneof![
        arb_literal().prop_map(TemplatePiece::Literal),
        (0..key_count.max(1), any::<bool>())
            .prop_map(|(i, padded)| TemplatePiece::Placeholder(i, padded)),
    ];
    proptest::collection::vec(piece, 0..8)
}

/// Render a template as source text (`{{ key }}` when padded).
#[must_use]
pub fn template_source(pieces: &[TemplatePiece], keys: &[String]) -> String {
    pieces
        .iter()
        .map(|piece| match piece {
            TemplatePiece::Literal(text) => text.clone(),
            TemplatePiece::Placeholder(i, true) => format!("{{{{ {} }}}}", keys[*i]),
            TemplatePiece::Placeholder(i, false) => format!("{{{{{}}}}}", keys[*i]),
        })
        .collect()
}

/// Render a template with each placeholder replaced by `lookup(key)`.
#[must_use]
pub fn template_expand(
    pieces: &[TemplatePiece],
    keys: &[String],
    lookup: impl Fn(&str) -> String,
) -> String {
    pieces
        .iter()
        .map(|piece| match piece {
            TemplatePiece::Literal(text) => text.clone(),
            TemplatePiece::Placeholder(i, _) => lookup(&keys[*i]),
        })
        .collect()
}
