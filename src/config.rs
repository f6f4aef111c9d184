//! Registry configuration.

use serde::Deserialize;

use crate::errors::{Result, TestVarsError};

/// Name reserved for the subject when nothing else is configured.
pub const DEFAULT_SUBJECT_NAME: &str = "subject";

/// Options a registry is built with.
///
/// Deserializable so hosts can keep it next to the rest of their test
/// configuration; missing fields fall back to [`RegistryConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// The one name whose definition can be read but never redefined.
    pub subject_name: String,
}

impl RegistryConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    /// Returns [`TestVarsError::InvalidConfig`] if the document is malformed,
    /// has unknown fields, or names an empty subject.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source).map_err(|e| TestVarsError::InvalidConfig {
            reason: e.to_string(),
        })?;
        if config.subject_name.is_empty() {
            return Err(TestVarsError::InvalidConfig {
                reason: "subject_name must not be empty".into(),
            });
        }
        Ok(config)
    }

    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            subject_name: DEFAULT_SUBJECT_NAME.to_string(),
        }
    }
}
