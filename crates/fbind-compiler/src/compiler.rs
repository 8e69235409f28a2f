#![forbid(unsafe_code)]

//! Tree walk that turns directive-annotated nodes into live bindings.
//!
//! # Architecture
//!
//! ```text
//! compile(root)
//!   ├─ take_children(root)        stage the whole subtree off the target
//!   ├─ visit(child) for each      directives, placeholders, then children
//!   └─ append_children(root, ..)  reattach in one operation
//! ```
//!
//! # Invariants
//!
//! 1. The model must already be intercepted: the first read of every
//!    expression is its dependency-collection pass.
//! 2. An element's directives run in attribute order, and each dispatched
//!    attribute is removed from the element.
//! 3. Children are enumerated after the element's own directives ran, so
//!    markup produced by `v-html` is compiled too.
//! 4. Every effect created is owned by the returned [`BindingScope`].
//!
//! # Failure Modes
//!
//! The first fault (unknown directive, missing handler, path fault) aborts
//! the walk. Staged children are reattached anyway; bindings created before
//! the fault are dropped with the partial scope.

use std::rc::Rc;

use fbind_backend::{NodeKind, RenderTarget};
use fbind_core::{BindingScope, EffectOptions, Mapping, Result};

use crate::directive::{Directive, DirectiveBinding};
use crate::handlers::{self, BindContext};
use crate::interpolation;
use crate::methods::MethodTable;

/// Compiles templates on one render target against one model.
pub struct TemplateCompiler<'a, T: RenderTarget> {
    cx: BindContext<'a, T>,
}

impl<'a, T: RenderTarget> TemplateCompiler<'a, T> {
    #[must_use]
    pub fn new(target: &'a Rc<T>, model: &'a Mapping, methods: &'a MethodTable<T::Event>) -> Self {
        Self {
            cx: BindContext {
                target,
                model,
                methods,
                options: EffectOptions::default(),
            },
        }
    }

    /// Options applied to every effect this compiler creates.
    #[must_use]
    pub fn effect_options(mut self, options: EffectOptions) -> Self {
        self.cx.options = options;
        self
    }

    /// Compile the subtree below `root`.
    pub fn compile(&self, root: &T::Node) -> Result<BindingScope> {
        let span = tracing::debug_span!("template_compile", root = ?root);
        let _guard = span.enter();

        let staged = self.cx.target.take_children(root);
        let mut scope = BindingScope::new();
        let walked = staged
            .iter()
            .try_for_each(|child| self.visit(child, &mut scope));
        self.cx.target.append_children(root, staged);

        if let Err(err) = walked {
            tracing::debug!(error = %err, "template compile aborted");
            return Err(err);
        }
        tracing::debug!(
            effects = scope.effect_count(),
            listeners = scope.listener_count(),
            "template compiled"
        );
        Ok(scope)
    }

    fn visit(&self, node: &T::Node, scope: &mut BindingScope) -> Result<()> {
        match self.cx.target.node_kind(node) {
            NodeKind::Element => self.compile_element(node, scope)?,
            NodeKind::Text => self.compile_text(node, scope)?,
            NodeKind::Other => {}
        }
        for child in self.cx.target.children(node) {
            self.visit(&child, scope)?;
        }
        Ok(())
    }

    fn compile_element(&self, node: &T::Node, scope: &mut BindingScope) -> Result<()> {
        for (name, value) in self.cx.target.attributes(node) {
            let Some(binding) = DirectiveBinding::parse(&name, &value)? else {
                continue;
            };
            tracing::trace!(
                directive = %binding.directive,
                expression = %binding.expression,
                reactive = binding.directive.is_reactive(),
                "dispatch directive"
            );
            self.dispatch(node, &binding, scope)?;
            self.cx.target.remove_attribute(node, &binding.attribute);
        }
        Ok(())
    }

    fn compile_text(&self, node: &T::Node, scope: &mut BindingScope) -> Result<()> {
        let content = self.cx.target.text_content(node);
        if interpolation::contains_placeholder(&content) {
            tracing::trace!(content = %content, "interpolate text");
            handlers::text(&self.cx, node, &content, scope)?;
        }
        Ok(())
    }

    fn dispatch(
        &self,
        node: &T::Node,
        binding: &DirectiveBinding,
        scope: &mut BindingScope,
    ) -> Result<()> {
        let expression = binding.expression.as_str();
        match &binding.directive {
            Directive::Text => handlers::text(&self.cx, node, expression, scope),
            Directive::Html => handlers::html(&self.cx, node, expression, scope),
            Directive::Model => handlers::model(&self.cx, node, expression, scope),
            Directive::Bind(attribute) => {
                handlers::bind(&self.cx, node, attribute, expression, scope)
            }
            Directive::On(event) => handlers::on(&self.cx, node, event, expression, scope),
        }
    }
}

/// Compile the subtree below `root` with default effect options.
pub fn compile<T: RenderTarget>(
    target: &Rc<T>,
    root: &T::Node,
    model: &Mapping,
    methods: &MethodTable<T::Event>,
) -> Result<BindingScope> {
    TemplateCompiler::new(target, model, methods).compile(root)
}
