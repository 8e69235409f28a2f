#![forbid(unsafe_code)]

//! Attribute-name parsing for the directive table.
//!
//! | Attribute | Directive | Argument |
//! |-----------|-----------|----------|
//! | `v-text`, `v-html`, `v-model` | text / html / model | ignored if given |
//! | `v-bind:href` | bind | `href` |
//! | `v-on:click` | on | `click` |
//! | `:href` | bind | `href` |
//! | `@click` | on | `click` |
//!
//! Any other name is a plain attribute and is left on the node.

use std::fmt;

use fbind_core::{BindError, Result};

/// A resolved directive, with its argument where the directive takes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Write the expression's value (or interpolated template) as text.
    Text,
    /// Write the expression's value as raw markup.
    Html,
    /// Two-way binding between the expression and an input value.
    Model,
    /// One-way binding of the expression to the named attribute.
    Bind(String),
    /// Attach the named method as a listener for the named event.
    On(String),
}

impl Directive {
    /// The directive's name in the `v-` namespace.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Model => "model",
            Self::Bind(_) => "bind",
            Self::On(_) => "on",
        }
    }

    /// The attribute or event name, for `bind` and `on`.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::Bind(arg) | Self::On(arg) => Some(arg.as_str()),
            _ => None,
        }
    }

    /// Whether this directive installs a reactive effect.
    #[must_use]
    pub const fn is_reactive(&self) -> bool {
        !matches!(self, Self::On(_))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(arg) => write!(f, "v-{}:{arg}", self.name()),
            None => write!(f, "v-{}", self.name()),
        }
    }
}

/// One directive attribute found on an element during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBinding {
    /// The attribute name as written (removed from the node after dispatch).
    pub attribute: String,
    /// The resolved directive.
    pub directive: Directive,
    /// The attribute value: a key path, a template, or a method name.
    pub expression: String,
}

impl DirectiveBinding {
    /// Parse an attribute. `Ok(None)` means a plain attribute.
    ///
    /// # Errors
    ///
    /// - [`BindError::UnknownDirective`] for a `v-` name with no handler.
    /// - [`BindError::MissingDirectiveArgument`] for `bind`/`on` without an
    ///   argument (including bare `:` and `@`).
    pub fn parse(name: &str, value: &str) -> Result<Option<Self>> {
        let Some(directive) = parse_name(name)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            attribute: name.to_owned(),
            directive,
            expression: value.to_owned(),
        }))
    }
}

fn parse_name(name: &str) -> Result<Option<Directive>> {
    if let Some(event) = name.strip_prefix('@') {
        return with_argument(name, event, Directive::On).map(Some);
    }
    if let Some(attr) = name.strip_prefix(':') {
        return with_argument(name, attr, Directive::Bind).map(Some);
    }
    let Some(rest) = name.strip_prefix("v-") else {
        return Ok(None);
    };

    let (directive, argument) = match rest.split_once(':') {
        Some((directive, argument)) => (directive, Some(argument)),
        None => (rest, None),
    };
    let resolved = match directive {
        "text" => Directive::Text,
        "html" => Directive::Html,
        "model" => Directive::Model,
        "bind" => with_argument(name, argument.unwrap_or_default(), Directive::Bind)?,
        "on" => with_argument(name, argument.unwrap_or_default(), Directive::On)?,
        other => return Err(BindError::UnknownDirective(other.to_owned())),
    };
    Ok(Some(resolved))
}

fn with_argument(
    name: &str,
    argument: &str,
    build: impl FnOnce(String) -> Directive,
) -> Result<Directive> {
    if argument.is_empty() {
        return Err(BindError::MissingDirectiveArgument(name.to_owned()));
    }
    Ok(build(argument.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(name: &str) -> Option<Directive> {
        DirectiveBinding::parse(name, "x").unwrap().map(|b| b.directive)
    }

    #[test]
    fn surface_syntaxes() {
        assert_eq!(directive("v-text"), Some(Directive::Text));
        assert_eq!(directive("v-html"), Some(Directive::Html));
        assert_eq!(directive("v-model"), Some(Directive::Model));
        assert_eq!(directive("v-bind:href"), Some(Directive::Bind("href".into())));
        assert_eq!(directive(":href"), Some(Directive::Bind("href".into())));
        assert_eq!(directive("v-on:click"), Some(Directive::On("click".into())));
        assert_eq!(directive("@click"), Some(Directive::On("click".into())));
    }

    #[test]
    fn argument_on_argumentless_directive_is_ignored() {
        assert_eq!(directive("v-text:lazy"), Some(Directive::Text));
    }

    #[test]
    fn plain_attributes() {
        assert_eq!(directive("class"), None);
        assert_eq!(directive("data-v-x"), None);
        assert_eq!(directive("on:click"), None);
    }

    #[test]
    fn binding_keeps_attribute_and_expression() {
        let binding = DirectiveBinding::parse("@click", "save").unwrap().unwrap();
        assert_eq!(binding.attribute, "@click");
        assert_eq!(binding.expression, "save");
        assert!(!binding.directive.is_reactive());
        assert_eq!(binding.directive.to_string(), "v-on:click");
    }

    #[test]
    fn unknown_directive() {
        assert_eq!(
            DirectiveBinding::parse("v-foo", "x"),
            Err(BindError::UnknownDirective("foo".into()))
        );
        assert_eq!(
            DirectiveBinding::parse("v-", "x"),
            Err(BindError::UnknownDirective(String::new()))
        );
    }

    #[test]
    fn missing_arguments() {
        for name in ["@", ":", "v-on", "v-on:", "v-bind", "v-bind:"] {
            assert_eq!(
                DirectiveBinding::parse(name, "x"),
                Err(BindError::MissingDirectiveArgument(name.into())),
                "{name}"
            );
        }
    }
}
