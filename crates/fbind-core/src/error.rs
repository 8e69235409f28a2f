#![forbid(unsafe_code)]

//! Error type shared by every FrankenBind layer.
//!
//! Faults are never recovered internally: the operation that hit the fault
//! (a compile pass, a model write, an input listener) is aborted and the
//! error surfaces to its caller. Work that completed before the fault is not
//! rolled back.
//!
//! # Failure Modes
//!
//! | Failure | Raised by | Typical cause |
//! |---------|-----------|---------------|
//! | [`BindError::PathResolution`] | `get_value` / `set_value` | intermediate segment is `null` or a leaf |
//! | [`BindError::IndexOutOfBounds`] | `set_value` on a sequence | sparse assignment past the end |
//! | [`BindError::UnknownDirective`] | template compiler | `v-foo` with no handler |
//! | [`BindError::MissingHandler`] | `on` directive | method name absent from the methods table |
//! | [`BindError::MountNotFound`] | view model | selector matched no node |

/// Errors raised while binding, reading, or writing the reactive model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum BindError {
    /// An intermediate segment did not resolve to a mapping or sequence.
    #[error("cannot resolve `{segment}` in `{path}`: value is {found}")]
    PathResolution {
        /// The full key path being resolved.
        path: String,
        /// The segment that could not be applied.
        segment: String,
        /// Kind of the value the segment was applied to.
        found: &'static str,
    },

    /// A sequence assignment addressed an index past the append position.
    #[error("index {index} out of bounds for `{path}` (len {len})")]
    IndexOutOfBounds {
        /// The full key path being written.
        path: String,
        /// The requested index.
        index: usize,
        /// The sequence length at the time of the write.
        len: usize,
    },

    /// A sequence segment was not a numeric index.
    #[error("`{segment}` is not a valid index in `{path}`")]
    InvalidIndex {
        /// The full key path being written.
        path: String,
        /// The offending segment.
        segment: String,
    },

    /// The model root handed to interception was not a mapping.
    #[error("model root must be a mapping, got {0}")]
    InvalidModel(&'static str),

    /// A `v-` attribute named a directive that has no handler.
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    /// `bind` or `on` was used without the attribute/event it targets.
    #[error("directive `{0}` requires an argument")]
    MissingDirectiveArgument(String),

    /// An event directive referenced a method that is not registered.
    #[error("no method named `{0}` is registered")]
    MissingHandler(String),

    /// The mount selector did not match any node in the render target.
    #[error("mount point `{0}` not found")]
    MountNotFound(String),

    /// A proxied accessor was used for a key that was not proxied at init.
    #[error("`{0}` is not a top-level model property")]
    UnknownProperty(String),

    /// A user-supplied method reported a failure.
    #[error("handler failed: {0}")]
    Handler(String),
}

/// Convenience alias used across the workspace.
pub type Result<T, E = BindError> = std::result::Result<T, E>;
