#![forbid(unsafe_code)]

//! `{{ expression }}` placeholders in text content.
//!
//! A placeholder is `{{`, at least one character on a single line, and the
//! nearest following `}}`. The expression between the braces is a key path
//! (segments are trimmed, so `{{ user.name }}` and `{{user.name}}` bind the
//! same property).

use std::sync::LazyLock;

use fbind_core::reactive::tracking;
use fbind_core::{KeyPath, Result, Value};
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("placeholder pattern is valid"));

/// Whether `text` contains at least one placeholder.
#[must_use]
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// A piece of interpolated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through unchanged.
    Literal(String),
    /// A placeholder and the key path it reads.
    Placeholder(KeyPath),
}

/// Text content split into literals and placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    source: String,
    segments: Vec<Segment>,
}

impl Interpolation {
    /// Split `text` into segments. A blank placeholder reads the empty key.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(text) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(text[last..whole.start()].to_owned()));
            }
            segments.push(Segment::Placeholder(KeyPath::parse(expr.as_str())));
            last = whole.end();
        }
        if last < text.len() {
            segments.push(Segment::Literal(text[last..].to_owned()));
        }
        Self {
            source: text.to_owned(),
            segments,
        }
    }

    /// The text this was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Literal and placeholder segments, in source order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any segment is a placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_)))
    }

    /// Distinct placeholder paths in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&KeyPath> {
        let mut out: Vec<&KeyPath> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(path) = segment
                && !out.iter().any(|seen| seen.segments() == path.segments())
            {
                out.push(path);
            }
        }
        out
    }

    /// Render with every placeholder replaced by `lookup(path)`.
    ///
    /// Lookups run with dependency collection suspended.
    pub fn render(&self, mut lookup: impl FnMut(&KeyPath) -> Result<Value>) -> Result<String> {
        tracking::untracked(|| {
            let mut out = String::with_capacity(self.source.len());
            for segment in &self.segments {
                match segment {
                    Segment::Literal(text) => out.push_str(text),
                    Segment::Placeholder(path) => out.push_str(&lookup(path)?.to_string()),
                }
            }
            Ok(out)
        })
    }
}
