//! Engine-wide configuration consumed by format injection and
//! serde-option building.
//!
//! A test-case build carries one `EngineConfig`; statements that leave
//! format properties unset inherit the configured defaults.

/// Key format applied when neither the statement nor the configuration
/// names one. The broker-native key serde handles primitive keys without
/// a registered schema.
pub const DEFAULT_KEY_FORMAT: &str = "KAFKA";

/// Engine configuration relevant to statement-to-topic inference.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Key format injected when a statement declares none
    pub default_key_format: String,
    /// Value format injected when a statement declares none; without it,
    /// a formatless statement cannot be resolved
    pub default_value_format: Option<String>,
    /// Engine-wide single-value wrapping preference, applied when a
    /// statement does not declare `wrap_single_value`
    pub wrap_single_values: Option<bool>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_key_format: DEFAULT_KEY_FORMAT.to_string(),
            default_value_format: None,
            wrap_single_values: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default key format.
    pub fn with_default_key_format(mut self, format: impl Into<String>) -> Self {
        self.default_key_format = format.into();
        self
    }

    /// Set the default value format.
    pub fn with_default_value_format(mut self, format: impl Into<String>) -> Self {
        self.default_value_format = Some(format.into());
        self
    }

    /// Set the engine-wide single-value wrapping preference.
    pub fn with_wrap_single_values(mut self, wrap: bool) -> Self {
        self.wrap_single_values = Some(wrap);
        self
    }
}
