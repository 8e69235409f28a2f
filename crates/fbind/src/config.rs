#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Defaults match the plain reactive semantics: every notification re-runs
//! its effect, and top-level model keys are proxied onto the view model.
//!
//! Sources, later overriding earlier:
//!
//! 1. [`EngineConfig::default`]
//! 2. TOML via [`EngineConfig::from_toml_str`]
//! 3. Environment via [`EngineConfig::with_env_overrides`]
//!
//! ```toml
//! equality_gating = true
//! proxy_data = false
//! ```

use std::env;

use fbind_core::EffectOptions;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`EngineConfig::equality_gating`].
pub const ENV_EQUALITY_GATING: &str = "FBIND_EQUALITY_GATING";
/// Environment variable overriding [`EngineConfig::proxy_data`].
pub const ENV_PROXY_DATA: &str = "FBIND_PROXY_DATA";

/// Errors raised while loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document was malformed or had unknown keys.
    #[error("invalid engine config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override was not a boolean.
    #[error("{var}={value}: expected a boolean (1/0/true/false/yes/no/on/off)")]
    InvalidEnv {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Behavior switches for a view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Skip an effect's callback when the re-read value is strictly equal to
    /// the last value it delivered.
    pub equality_gating: bool,
    /// Expose top-level model keys through `ViewModel::get`/`set`.
    pub proxy_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            equality_gating: false,
            proxy_data: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Apply `FBIND_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply `FBIND_*` overrides read through `get`.
    pub fn with_overrides_from<F>(mut self, mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(value) = get(ENV_EQUALITY_GATING) {
            self.equality_gating = parse_bool(ENV_EQUALITY_GATING, value)?;
        }
        if let Some(value) = get(ENV_PROXY_DATA) {
            self.proxy_data = parse_bool(ENV_PROXY_DATA, value)?;
        }
        tracing::debug!(
            equality_gating = self.equality_gating,
            proxy_data = self.proxy_data,
            "engine config resolved"
        );
        Ok(self)
    }

    /// Effect options derived from this config.
    #[must_use]
    pub fn effect_options(&self) -> EffectOptions {
        EffectOptions {
            gate_on_change: self.equality_gating,
        }
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!(!config.equality_gating);
        assert!(config.proxy_data);
        assert!(!config.effect_options().gate_on_change);
    }

    #[test]
    fn toml_partial_document_keeps_defaults() {
        let config = EngineConfig::from_toml_str("equality_gating = true").unwrap();
        assert!(config.equality_gating);
        assert!(config.proxy_data);
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn toml_rejects_unknown_and_mistyped_keys() {
        assert!(matches!(
            EngineConfig::from_toml_str("batching = true"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("proxy_data = \"maybe\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_win() {
        let config = EngineConfig::from_toml_str("equality_gating = true")
            .unwrap()
            .with_overrides_from(env_of(&[
                (ENV_EQUALITY_GATING, "0"),
                (ENV_PROXY_DATA, " OFF "),
            ]))
            .unwrap();
        assert!(!config.equality_gating);
        assert!(!config.proxy_data);
    }

    #[test]
    fn env_absent_changes_nothing() {
        let config = EngineConfig::default().with_overrides_from(|_| None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn env_rejects_non_boolean() {
        let err = EngineConfig::default()
            .with_overrides_from(env_of(&[(ENV_PROXY_DATA, "sometimes")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "FBIND_PROXY_DATA=sometimes: expected a boolean (1/0/true/false/yes/no/on/off)"
        );
    }
}
