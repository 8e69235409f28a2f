#![forbid(unsafe_code)]

//! A small, lenient markup parser for test fixtures.
//!
//! Understands elements, quoted/bare/valueless attributes, void elements,
//! self-closing tags, comments, and text. It never fails: stray close tags
//! are dropped, unclosed elements are closed at end of input, and anything
//! that does not start a tag is text. Character references are kept
//! verbatim.

use std::fmt;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Whether `tag` is a void element.
#[must_use]
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// One parsed markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Markup>,
    },
    Text(String),
    Comment(String),
}

/// Parse a markup fragment into its top-level nodes.
#[must_use]
pub fn parse_fragment(input: &str) -> Vec<Markup> {
    Parser::new(input).run()
}

struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Markup>,
}

impl OpenElement {
    fn finish(self) -> Markup {
        Markup::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    root: Vec<Markup>,
    open: Vec<OpenElement>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            root: Vec::new(),
            open: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Markup> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            if rest.starts_with("<!--") {
                self.comment();
            } else if rest.starts_with("</") {
                self.close_tag();
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.open_tag();
            } else {
                self.text();
            }
        }
        while let Some(element) = self.open.pop() {
            self.push(element.finish());
        }
        self.root
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn push(&mut self, node: Markup) {
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let (Markup::Text(more), Some(Markup::Text(prev))) = (&node, siblings.last_mut()) {
            prev.push_str(more);
            return;
        }
        siblings.push(node);
    }

    fn text(&mut self) {
        let rest = &self.src[self.pos..];
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let end = rest[first..]
            .find('<')
            .map_or(self.src.len(), |i| self.pos + first + i);
        let text = self.src[self.pos..end].to_owned();
        self.pos = end;
        self.push(Markup::Text(text));
    }

    fn comment(&mut self) {
        let body = self.pos + 4;
        let (text, next) = match self.src[body..].find("-->") {
            Some(i) => (&self.src[body..body + i], body + i + 3),
            None => (&self.src[body..], self.src.len()),
        };
        let text = text.to_owned();
        self.pos = next;
        self.push(Markup::Comment(text));
    }

    fn close_tag(&mut self) {
        let start = self.pos + 2;
        let (name, next) = match self.src[start..].find('>') {
            Some(i) => (&self.src[start..start + i], start + i + 1),
            None => (&self.src[start..], self.src.len()),
        };
        let name = name.trim().to_ascii_lowercase();
        self.pos = next;

        let Some(depth) = self.open.iter().rposition(|e| e.tag == name) else {
            return;
        };
        while self.open.len() > depth {
            if let Some(element) = self.open.pop() {
                self.push(element.finish());
            }
        }
    }

    fn open_tag(&mut self) {
        let src = self.src;
        self.pos += 1;
        let tag = self
            .take_while(|c| c.is_ascii_alphanumeric() || c == '-')
            .to_ascii_lowercase();
        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = &src[self.pos..];
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }

            let name = self.take_while(|c| {
                !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')
            });
            if name.is_empty() {
                // Stray '/', quote, or '='.
                self.pos += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            }
            let name = name.to_owned();

            self.skip_whitespace();
            let value = if self.peek() == Some('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.attribute_value()
            } else {
                String::new()
            };

            if !attributes.iter().any(|(n, _)| *n == name) {
                attributes.push((name, value));
            }
        }

        if self_closing || is_void(&tag) {
            self.push(Markup::Element {
                tag,
                attributes,
                children: Vec::new(),
            });
        } else {
            self.open.push(OpenElement {
                tag,
                attributes,
                children: Vec::new(),
            });
        }
    }

    fn attribute_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value = self.take_while(|c| c != quote).to_owned();
                if self.peek() == Some(quote) {
                    self.pos += 1;
                }
                value
            }
            _ => self
                .take_while(|c| !c.is_whitespace() && c != '>')
                .to_owned(),
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Comment(text) => write!(f, "<!--{text}-->"),
            Self::Element {
                tag,
                attributes,
                children,
            } => {
                write!(f, "<{tag}")?;
                for (name, value) in attributes {
                    write!(f, " {name}=\"{value}\"")?;
                }
                f.write_str(">")?;
                if is_void(tag) {
                    return Ok(());
                }
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(tag: &str, attributes: &[(&str, &str)], children: Vec<Markup>) -> Markup {
        Markup::Element {
            tag: tag.into(),
            attributes: attributes
                .iter()
                .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
                .collect(),
            children,
        }
    }

    fn text(s: &str) -> Markup {
        Markup::Text(s.into())
    }

    #[test]
    fn nested_elements_and_text() {
        let nodes = parse_fragment("<div id=\"app\"><span>{{count}}</span> tail</div>");
        assert_eq!(
            nodes,
            vec![el(
                "div",
                &[("id", "app")],
                vec![el("span", &[], vec![text("{{count}}")]), text(" tail")],
            )]
        );
    }

    #[test]
    fn attribute_forms() {
        let nodes = parse_fragment("<input v-model='name' disabled :value=x @input=\"go\">");
        assert_eq!(
            nodes,
            vec![el(
                "input",
                &[
                    ("v-model", "name"),
                    ("disabled", ""),
                    (":value", "x"),
                    ("@input", "go"),
                ],
                vec![],
            )]
        );
    }

    #[test]
    fn void_and_self_closing_elements_take_no_children() {
        let nodes = parse_fragment("<br>a<custom-el/>b");
        assert_eq!(
            nodes,
            vec![el("br", &[], vec![]), text("a"), el("custom-el", &[], vec![]), text("b")]
        );
    }

    #[test]
    fn comments_are_kept() {
        let nodes = parse_fragment("<p><!-- {{x}} --></p>");
        assert_eq!(
            nodes,
            vec![el("p", &[], vec![Markup::Comment(" {{x}} ".into())])]
        );
    }

    #[test]
    fn lenient_recovery() {
        assert_eq!(parse_fragment("</p>x"), vec![text("x")]);
        assert_eq!(
            parse_fragment("<ul><li>a"),
            vec![el("ul", &[], vec![el("li", &[], vec![text("a")])])]
        );
        assert_eq!(parse_fragment("a < b"), vec![text("a < b")]);
        assert_eq!(parse_fragment("<div"), vec![el("div", &[], vec![])]);
    }

    #[test]
    fn close_tag_closes_intermediate_elements() {
        let nodes = parse_fragment("<div><b>x</div>y");
        assert_eq!(
            nodes,
            vec![el("div", &[], vec![el("b", &[], vec![text("x")])]), text("y")]
        );
    }

    #[test]
    fn duplicate_attribute_keeps_first() {
        let nodes = parse_fragment("<a href=1 href=2></a>");
        assert_eq!(nodes, vec![el("a", &[("href", "1")], vec![])]);
    }

    #[test]
    fn non_ascii_text_is_preserved() {
        assert_eq!(parse_fragment("héllo <b>wörld</b>").len(), 2);
        assert_eq!(parse_fragment("<é"), vec![text("<é")]);
    }

    #[test]
    fn display_serializes() {
        let markup = "<p class=\"x\">a<br>b<!--c--></p>";
        let nodes = parse_fragment(markup);
        let out: String = nodes.iter().map(ToString::to_string).collect();
        assert_eq!(out, markup);
    }
}
