//! Error types for the bom-core crate.
//!
//! This module provides two error types:
//!
//! - [`NameError`] for malformed versions, namespace keys, qualified names,
//!   and import clauses
//! - [`ConfigError`] for registry configuration loading failures

use camino::Utf8PathBuf;

/// Errors produced while parsing the textual forms of model names.
///
/// Every variant carries the offending input so that callers can surface it
/// verbatim.
///
/// # Examples
///
/// ```
/// use bom_core::{NameError, Version};
///
/// let err = "1.0".parse::<Version>().unwrap_err();
/// assert!(matches!(err, NameError::InvalidVersion { .. }));
/// assert!(err.to_string().contains("1.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The text is not a semantic version (`major.minor.patch[-pre][+build]`).
    #[error("invalid semantic version '{input}': {reason}")]
    InvalidVersion {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The text is not a namespace key (`name` or `name@version`).
    #[error("invalid namespace '{input}': {reason}")]
    InvalidNamespace {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The text is not a fully-qualified type name.
    #[error("invalid qualified name '{input}': {reason}")]
    InvalidQualifiedName {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The text is not an import clause.
    #[error("invalid import '{input}': {reason}")]
    InvalidImport {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl NameError {
    /// Creates a new [`NameError::InvalidVersion`] error.
    #[inline]
    pub fn version(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidVersion {
            input: input.into(),
            reason,
        }
    }

    /// Creates a new [`NameError::InvalidNamespace`] error.
    #[inline]
    pub fn namespace(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidNamespace {
            input: input.into(),
            reason,
        }
    }

    /// Creates a new [`NameError::InvalidQualifiedName`] error.
    #[inline]
    pub fn qualified(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidQualifiedName {
            input: input.into(),
            reason,
        }
    }

    /// Creates a new [`NameError::InvalidImport`] error.
    #[inline]
    pub fn import(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidImport {
            input: input.into(),
            reason,
        }
    }
}

/// Errors that can occur while loading a registry configuration.
///
/// # Examples
///
/// ```
/// use bom_core::RegistryConfig;
///
/// let err = RegistryConfig::from_json_str("{not json").unwrap_err();
/// assert!(err.to_string().contains("failed to parse configuration"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for [`crate::RegistryConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display() {
        let err = NameError::version("1.x.0", "minor is not a number");
        let msg = err.to_string();
        assert!(msg.contains("1.x.0"));
        assert!(msg.contains("minor is not a number"));
    }

    #[test]
    fn test_invalid_namespace_display() {
        let err = NameError::namespace("org@", "empty version");
        assert_eq!(err.to_string(), "invalid namespace 'org@': empty version");
    }

    #[test]
    fn test_config_io_display() {
        let err = ConfigError::Io {
            path: Utf8PathBuf::from("/etc/bom/registry.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/etc/bom/registry.json"));
    }
}
