#![forbid(unsafe_code)]

//! Directive handlers.
//!
//! Each reactive handler builds its effect first and renders the node from
//! the value the effect read while collecting dependencies, so a binding
//! resolves its path exactly once at bind time.

use std::rc::Rc;

use fbind_backend::{Listener, RenderTarget};
use fbind_core::{
    BindingScope, EffectOptions, KeyPath, Mapping, ReactiveEffect, Result, Value, get_value,
    set_value,
};

use crate::interpolation::Interpolation;
use crate::methods::MethodTable;

/// Everything a handler needs besides the node.
pub(crate) struct BindContext<'a, T: RenderTarget> {
    pub(crate) target: &'a Rc<T>,
    pub(crate) model: &'a Mapping,
    pub(crate) methods: &'a MethodTable<T::Event>,
    pub(crate) options: EffectOptions,
}

impl<T: RenderTarget> BindContext<'_, T> {
    /// Build an effect that forwards each new value to `write`, render the
    /// initial value with the same `write`, and hand the effect to `scope`.
    fn bind_value(
        &self,
        node: &T::Node,
        expression: &str,
        scope: &mut BindingScope,
        write: impl Fn(&T, &T::Node, &Value) + 'static,
    ) -> Result<()> {
        let write = Rc::new(write);
        let target = Rc::clone(self.target);
        let bound = node.clone();
        let sink = Rc::clone(&write);
        let effect = ReactiveEffect::with_options(expression, self.model, self.options, move |v| {
            sink(&target, &bound, v);
            Ok(())
        })?;
        write(self.target, node, &effect.last_value());
        tracing::trace!(effect = effect.id().get(), path = %effect.key_path(), "binding installed");
        scope.hold(effect);
        Ok(())
    }
}

/// `{{ }}` text or `v-text`.
pub(crate) fn text<T: RenderTarget>(
    cx: &BindContext<'_, T>,
    node: &T::Node,
    content: &str,
    scope: &mut BindingScope,
) -> Result<()> {
    let interpolation = Interpolation::parse(content);
    if !interpolation.has_placeholders() {
        return cx.bind_value(node, content, scope, |target, node, value| {
            target.set_text_content(node, &value.to_string());
        });
    }

    let interpolation = Rc::new(interpolation);
    let mut initial: Vec<(KeyPath, Value)> = Vec::new();
    for path in interpolation.placeholders() {
        let target = Rc::clone(cx.target);
        let bound = node.clone();
        let template = Rc::clone(&interpolation);
        let model = cx.model.clone();
        let effect =
            ReactiveEffect::with_options(path.as_str(), cx.model, cx.options, move |_| {
                let text = template.render(|p| get_value(p, &model))?;
                target.set_text_content(&bound, &text);
                Ok(())
            })?;
        initial.push((path.clone(), effect.last_value()));
        tracing::trace!(effect = effect.id().get(), path = %path, "placeholder bound");
        scope.hold(effect);
    }

    let text = interpolation.render(|p| {
        Ok(initial
            .iter()
            .find(|(seen, _)| seen.segments() == p.segments())
            .map(|(_, v)| v.clone())
            .unwrap_or_default())
    })?;
    cx.target.set_text_content(node, &text);
    Ok(())
}

/// `v-html`: raw markup, no escaping.
pub(crate) fn html<T: RenderTarget>(
    cx: &BindContext<'_, T>,
    node: &T::Node,
    expression: &str,
    scope: &mut BindingScope,
) -> Result<()> {
    cx.bind_value(node, expression, scope, |target, node, value| {
        target.set_inner_html(node, &value.to_string());
    })
}

/// `v-model`: model → input value, and `input` events → model.
pub(crate) fn model<T: RenderTarget>(
    cx: &BindContext<'_, T>,
    node: &T::Node,
    expression: &str,
    scope: &mut BindingScope,
) -> Result<()> {
    cx.bind_value(node, expression, scope, |target, node, value| {
        target.set_input_value(node, &value.to_string());
    })?;

    let path = KeyPath::parse(expression);
    let model = cx.model.clone();
    let target = Rc::downgrade(cx.target);
    let bound = node.clone();
    let listener: Listener<T::Event> = Rc::new(move |event: &T::Event| {
        let Some(target) = target.upgrade() else {
            return Ok(());
        };
        let value = target
            .event_value(event)
            .unwrap_or_else(|| target.input_value(&bound));
        tracing::trace!(path = %path, "input written back to model");
        set_value(&path, &model, Value::String(value))
    });
    cx.target.add_event_listener(node, "input", listener);
    scope.record_listener();
    Ok(())
}

/// `:attr` / `v-bind:attr`: one-way attribute binding.
pub(crate) fn bind<T: RenderTarget>(
    cx: &BindContext<'_, T>,
    node: &T::Node,
    attribute: &str,
    expression: &str,
    scope: &mut BindingScope,
) -> Result<()> {
    let attribute = attribute.to_owned();
    cx.bind_value(node, expression, scope, move |target, node, value| {
        target.set_attribute(node, &attribute, &value.to_string());
    })
}

/// `@event` / `v-on:event`: attach a named method. No effect.
pub(crate) fn on<T: RenderTarget>(
    cx: &BindContext<'_, T>,
    node: &T::Node,
    event: &str,
    method: &str,
    scope: &mut BindingScope,
) -> Result<()> {
    let listener = cx.methods.resolve(method)?;
    cx.target.add_event_listener(node, event, listener);
    scope.record_listener();
    Ok(())
}
