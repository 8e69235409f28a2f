#![forbid(unsafe_code)]

//! Construction options for a [`ViewModel`].

use std::fmt;
use std::rc::Rc;

use fbind_backend::{MountPoint, RenderTarget};
use fbind_core::Result;

use crate::config::EngineConfig;
use crate::view_model::ViewModel;

/// A named method. Receives the view model it was registered on.
pub type Method<T> = Rc<dyn Fn(&ViewModel<T>, &<T as RenderTarget>::Event) -> Result<()>>;

/// Builder for [`ViewModel::new`].
///
/// ```
/// use fbind::{ViewModelOptions, EngineConfig};
/// use fbind_harness::MemoryDom;
/// use serde_json::json;
///
/// let options = ViewModelOptions::<MemoryDom>::new()
///     .mount("#app")
///     .data(json!({"count": 0}))
///     .method("reset", |vm, _event| vm.set("count", 0))
///     .config(EngineConfig::default());
/// assert!(options.has_mount());
/// ```
pub struct ViewModelOptions<T: RenderTarget> {
    pub(crate) mount: Option<MountPoint<T::Node>>,
    pub(crate) data: serde_json::Value,
    pub(crate) methods: Vec<(String, Method<T>)>,
    pub(crate) config: EngineConfig,
}

impl<T: RenderTarget> Default for ViewModelOptions<T> {
    fn default() -> Self {
        Self {
            mount: None,
            data: serde_json::Value::Object(serde_json::Map::new()),
            methods: Vec::new(),
            config: EngineConfig::default(),
        }
    }
}

impl<T: RenderTarget> ViewModelOptions<T> {
    /// Empty options: no mount point, `{}` data, no methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount on a selector (or any [`MountPoint`]).
    #[must_use]
    pub fn mount(mut self, mount: impl Into<MountPoint<T::Node>>) -> Self {
        self.mount = Some(mount.into());
        self
    }

    /// Mount on an already-resolved node.
    #[must_use]
    pub fn mount_node(mut self, node: T::Node) -> Self {
        self.mount = Some(MountPoint::Node(node));
        self
    }

    /// Initial model. Must be a JSON object.
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Register a method for `@event` / `v-on:event` directives.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&ViewModel<T>, &T::Event) -> Result<()> + 'static,
    ) -> Self {
        self.methods.push((name.into(), Rc::new(method)));
        self
    }

    /// Replace the engine config.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether a mount point was set.
    #[must_use]
    pub fn has_mount(&self) -> bool {
        self.mount.is_some()
    }
}

impl<T: RenderTarget> fmt::Debug for ViewModelOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelOptions")
            .field("mount", &self.mount)
            .field("data", &self.data)
            .field(
                "methods",
                &self.methods.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}
