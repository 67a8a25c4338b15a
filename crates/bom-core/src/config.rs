//! Registry configuration.
//!
//! [`RegistryConfig`] is fixed when a registry is constructed. Its single
//! policy switch, `versioned_namespaces_strict`, governs registration, import
//! resolution, type resolution, and decoding alike.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a model registry.
///
/// # Examples
///
/// ```
/// use bom_core::RegistryConfig;
///
/// let config = RegistryConfig::default();
/// assert!(!config.versioned_namespaces_strict);
/// assert!(config.system_model);
///
/// let strict = RegistryConfig::strict();
/// assert!(strict.versioned_namespaces_strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Require every namespace and every import to carry a semantic version.
    pub versioned_namespaces_strict: bool,

    /// Pre-register the built-in `concerto@1.0.0` namespace of base types.
    pub system_model: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            versioned_namespaces_strict: false,
            system_model: true,
        }
    }
}

impl RegistryConfig {
    /// The default configuration with the strict versioning policy enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            versioned_namespaces_strict: true,
            ..Self::default()
        }
    }

    /// Parses a configuration from a JSON document.
    ///
    /// Missing keys take their default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bom_core::RegistryConfig;
    ///
    /// let config = RegistryConfig::from_json_str(r#"{"versioned_namespaces_strict": true}"#)?;
    /// assert!(config.versioned_namespaces_strict);
    /// assert!(config.system_model);
    /// # Ok::<(), bom_core::ConfigError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert!(!config.versioned_namespaces_strict);
        assert!(config.system_model);
    }

    #[test]
    fn test_strict_keeps_other_defaults() {
        let config = RegistryConfig::strict();
        assert!(config.versioned_namespaces_strict);
        assert!(config.system_model);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let config = RegistryConfig::from_json_str(r#"{"system_model": false}"#).unwrap();
        assert!(!config.system_model);
        assert!(!config.versioned_namespaces_strict);
    }

    #[test]
    fn test_config_serialization() {
        insta::assert_json_snapshot!(RegistryConfig::strict(), @r#"
        {
          "versioned_namespaces_strict": true,
          "system_model": true
        }
        "#);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegistryConfig::load(Utf8Path::new("/nonexistent/bom/registry.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
