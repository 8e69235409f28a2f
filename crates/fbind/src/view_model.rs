#![forbid(unsafe_code)]

//! The view model: a model bound to a mounted template.
//!
//! # Construction order
//!
//! 1. Intercept `data` into the reactive model.
//! 2. Resolve the mount point. Without one the view model is inert: the
//!    model is readable and writable but nothing is bound or proxied.
//! 3. Compile the mount point's subtree. Methods are bound to this view
//!    model before compilation so `on` directives can attach them.
//! 4. Proxy the top-level keys present in `data` (when enabled).
//!
//! Interception must precede compilation: compilation's first read of each
//! expression is the one that subscribes its effect.
//!
//! # Ownership
//!
//! The view model owns the compiled bindings. Listeners attached to the
//! render target hold it weakly, so dropping the last `ViewModel` handle
//! stops every binding even if the target outlives it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fbind_backend::{Listener, RenderTarget};
use fbind_compiler::{MethodTable, TemplateCompiler};
use fbind_core::{BindError, BindingScope, Mapping, Result, Value, get_path, intercept_root, set_path};

use crate::config::EngineConfig;
use crate::options::{Method, ViewModelOptions};

struct Inner<T: RenderTarget> {
    target: Rc<T>,
    data: Mapping,
    root: Option<T::Node>,
    proxied: Vec<String>,
    config: EngineConfig,
    bindings: RefCell<BindingScope>,
}

/// A reactive model bound to a template on a render target.
///
/// Cloning is cheap and yields another handle to the same view model.
pub struct ViewModel<T: RenderTarget> {
    inner: Rc<Inner<T>>,
}

impl<T: RenderTarget> Clone for ViewModel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: RenderTarget> ViewModel<T> {
    /// Intercept the data, mount, and compile.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidModel`] when `data` is not a JSON object.
    /// - [`BindError::MountNotFound`] when a selector matches nothing.
    /// - Any compile fault (unknown directive, missing method, path fault).
    pub fn new(target: Rc<T>, options: ViewModelOptions<T>) -> Result<Self> {
        let ViewModelOptions {
            mount,
            data,
            methods,
            config,
        } = options;
        let span = tracing::debug_span!("view_model_mount", proxy_data = config.proxy_data);
        let _guard = span.enter();

        let data = intercept_root(data)?;
        let Some(mount) = mount else {
            tracing::debug!("no mount point; nothing bound");
            return Ok(Self::from_inner(Inner {
                target,
                data,
                root: None,
                proxied: Vec::new(),
                config,
                bindings: RefCell::new(BindingScope::new()),
            }));
        };
        let root = mount.resolve(target.as_ref())?;

        let proxied = if config.proxy_data {
            data.keys()
        } else {
            Vec::new()
        };
        let inner = Rc::new(Inner {
            target,
            data,
            root: Some(root.clone()),
            proxied,
            config,
            bindings: RefCell::new(BindingScope::new()),
        });

        let table = bind_methods(&inner, methods);
        let scope = TemplateCompiler::new(&inner.target, &inner.data, &table)
            .effect_options(config.effect_options())
            .compile(&root)?;
        tracing::debug!(
            effects = scope.effect_count(),
            listeners = scope.listener_count(),
            proxied = inner.proxied.len(),
            "view model mounted"
        );
        *inner.bindings.borrow_mut() = scope;
        Ok(Self { inner })
    }

    fn from_inner(inner: Inner<T>) -> Self {
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Read a proxied top-level property.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.check_proxied(key)?;
        Ok(self.inner.data.read(key).unwrap_or_default())
    }

    /// Write a proxied top-level property. Strictly-equal writes are no-ops.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.check_proxied(key)?;
        let value = value.into();
        if self
            .inner
            .data
            .peek(key)
            .is_some_and(|current| current.strict_eq(&value))
        {
            return Ok(());
        }
        self.inner.data.write(key, value)
    }

    fn check_proxied(&self, key: &str) -> Result<()> {
        if self.inner.proxied.iter().any(|k| k == key) {
            Ok(())
        } else {
            Err(BindError::UnknownProperty(key.to_owned()))
        }
    }

    /// The root of the reactive model.
    #[must_use]
    pub fn data(&self) -> &Mapping {
        &self.inner.data
    }

    /// Resolve a key path against the model.
    pub fn read_path(&self, path: &str) -> Result<Value> {
        get_path(path, &self.inner.data)
    }

    /// Assign through a key path.
    pub fn write_path(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        set_path(path, &self.inner.data, value)
    }

    /// The mounted node, if any.
    #[must_use]
    pub fn root(&self) -> Option<&T::Node> {
        self.inner.root.as_ref()
    }

    /// The render target the template was compiled on.
    #[must_use]
    pub fn target(&self) -> &Rc<T> {
        &self.inner.target
    }

    /// The engine config this view model was built with.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.inner.config
    }

    /// Whether a template was compiled.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.root.is_some()
    }

    /// Top-level keys reachable through [`get`](Self::get)/[`set`](Self::set).
    #[must_use]
    pub fn proxied_keys(&self) -> &[String] {
        &self.inner.proxied
    }

    /// Number of live effects owned by the compiled template.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        self.inner.bindings.borrow().effect_count()
    }

    /// Number of event listeners the template attached.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.bindings.borrow().listener_count()
    }

    /// Whether two handles refer to the same view model.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn bind_methods<T: RenderTarget>(
    inner: &Rc<Inner<T>>,
    methods: Vec<(String, Method<T>)>,
) -> MethodTable<T::Event> {
    let mut table = MethodTable::new();
    for (name, method) in methods {
        let receiver: Weak<Inner<T>> = Rc::downgrade(inner);
        let listener: Listener<T::Event> = Rc::new(move |event: &T::Event| {
            let Some(inner) = receiver.upgrade() else {
                return Ok(());
            };
            method(&ViewModel { inner }, event)
        });
        table.insert(name, listener);
    }
    table
}

impl<T: RenderTarget> fmt::Debug for ViewModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("root", &self.inner.root)
            .field("data", &self.inner.data.to_plain())
            .field("proxied", &self.inner.proxied)
            .field("config", &self.inner.config)
            .field("bindings", &*self.inner.bindings.borrow())
            .finish()
    }
}
