//! Editor session configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and display knobs for an editor session.
///
/// Every field has a default so a partial TOML document (or an empty one)
/// yields a usable configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Quiet period after the last edit before a debounced auto-save fires.
    #[serde(default = "default_quiet_interval_ms")]
    pub quiet_interval_ms: u64,
    /// Interval of the periodic fallback auto-save loop.
    #[serde(default = "default_periodic_interval_ms")]
    pub periodic_interval_ms: u64,
    /// Word target used for the progress indicator. Purely cosmetic.
    #[serde(default = "default_target_words")]
    pub target_words: usize,
}

fn default_quiet_interval_ms() -> u64 {
    5_000
}

fn default_periodic_interval_ms() -> u64 {
    30_000
}

fn default_target_words() -> usize {
    80_000
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quiet_interval_ms: default_quiet_interval_ms(),
            periodic_interval_ms: default_periodic_interval_ms(),
            target_words: default_target_words(),
        }
    }
}

impl EditorConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the document is not valid TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn quiet_interval(&self) -> Duration {
        Duration::from_millis(self.quiet_interval_ms)
    }

    pub fn periodic_interval(&self) -> Duration {
        Duration::from_millis(self.periodic_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EditorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.quiet_interval(), Duration::from_secs(5));
        assert_eq!(config.periodic_interval(), Duration::from_secs(30));
        assert_eq!(config.target_words, 80_000);
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = EditorConfig::from_toml_str("quiet_interval_ms = 2000").unwrap();
        assert_eq!(config.quiet_interval(), Duration::from_secs(2));
        assert_eq!(config.periodic_interval_ms, 30_000);
    }

    #[test]
    fn invalid_toml_is_a_serialization_error() {
        let err = EditorConfig::from_toml_str("quiet_interval_ms = ").unwrap_err();
        assert!(matches!(
            err,
            crate::error::EditorError::Serialization { .. }
        ));
    }
}
