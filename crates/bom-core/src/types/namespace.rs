//! Namespace keys and fully-qualified type names.
//!
//! A namespace is addressed by its canonical string: the bare `name`, or
//! `name@version` when a semantic version is attached. The fully-qualified name
//! of a declaration appends `.TypeName` to that string and doubles as the
//! `$class` discriminator on the wire.
//!
//! ```
//! use bom_core::{NamespaceKey, QualifiedName};
//!
//! let key: NamespaceKey = "org.acme@1.0.0".parse()?;
//! assert_eq!(key.name(), "org.acme");
//! assert_eq!(key.canonical(), "org.acme@1.0.0");
//!
//! let fqn = QualifiedName::new(key, "Vehicle");
//! assert_eq!(fqn.to_string(), "org.acme@1.0.0.Vehicle");
//! # Ok::<(), bom_core::NameError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::version::Version;
use crate::error::NameError;

/// Returns `true` if `s` is a single identifier: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
///
/// ```
/// use bom_core::is_identifier;
///
/// assert!(is_identifier("Person"));
/// assert!(is_identifier("_internal2"));
/// assert!(!is_identifier("2fast"));
/// assert!(!is_identifier("a.b"));
/// ```
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Identity of a namespace: its dotted name plus an optional version.
///
/// Two keys are equal exactly when their canonical strings are equal.
/// `org.acme` and `org.acme@1.0.0` are different namespaces.
///
/// # Examples
///
/// ```
/// use bom_core::{NamespaceKey, Version};
///
/// let bare = NamespaceKey::unversioned("test")?;
/// assert!(!bare.is_versioned());
/// assert_eq!(bare.canonical(), "test");
///
/// let versioned = NamespaceKey::versioned("test", Version::new(1, 0, 0))?;
/// assert_eq!(versioned.canonical(), "test@1.0.0");
/// assert_ne!(bare, versioned);
/// # Ok::<(), bom_core::NameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespaceKey {
    name: String,
    version: Option<Version>,
}

impl NamespaceKey {
    /// Creates a key from a dotted namespace name and an optional version.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::InvalidNamespace`] if `name` is not a sequence of
    /// `.`-separated identifiers.
    pub fn new(name: impl Into<String>, version: Option<Version>) -> Result<Self, NameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NameError::namespace(name, "empty namespace name"));
        }
        if !name.split('.').all(is_identifier) {
            return Err(NameError::namespace(
                name,
                "namespace segments must be identifiers",
            ));
        }
        Ok(Self { name, version })
    }

    /// Creates a key without a version.
    ///
    /// # Errors
    ///
    /// See [`NamespaceKey::new`].
    pub fn unversioned(name: impl Into<String>) -> Result<Self, NameError> {
        Self::new(name, None)
    }

    /// Creates a key carrying `version`.
    ///
    /// # Errors
    ///
    /// See [`NamespaceKey::new`].
    pub fn versioned(name: impl Into<String>, version: Version) -> Result<Self, NameError> {
        Self::new(name, Some(version))
    }

    /// The dotted namespace name, without any version.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attached version, if any.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Returns `true` if this key carries a version.
    #[inline]
    #[must_use]
    pub const fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// The canonical string used for registry lookup.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Builds the fully-qualified name of `type_name` inside this namespace.
    #[must_use]
    pub fn qualify(&self, type_name: impl Into<String>) -> QualifiedName {
        QualifiedName::new(self.clone(), type_name)
    }
}

impl FromStr for NamespaceKey {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((name, version)) => {
                if version.is_empty() {
                    return Err(NameError::namespace(s, "empty version"));
                }
                let version = version
                    .parse()
                    .map_err(|_| NameError::namespace(s, "version is not a semantic version"))?;
                Self::new(name, Some(version))
            }
            None => Self::new(s, None),
        }
    }
}

impl TryFrom<String> for NamespaceKey {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NamespaceKey> for String {
    fn from(value: NamespaceKey) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{version}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A fully-qualified type name: `namespace[@version].TypeName`.
///
/// The namespace part is everything before the last `.`, so dotted
/// namespaces and dotted versions both survive a round trip through the
/// string form.
///
/// # Examples
///
/// ```
/// use bom_core::QualifiedName;
///
/// let fqn: QualifiedName = "person@1.0.0.Person".parse()?;
/// assert_eq!(fqn.namespace().canonical(), "person@1.0.0");
/// assert_eq!(fqn.name(), "Person");
/// # Ok::<(), bom_core::NameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    namespace: NamespaceKey,
    name: String,
}

impl QualifiedName {
    /// Creates a qualified name from its parts.
    #[must_use]
    pub fn new(namespace: NamespaceKey, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// The owning namespace.
    #[inline]
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceKey {
        &self.namespace
    }

    /// The short declaration name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for QualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((namespace, name)) = s.rsplit_once('.') else {
            return Err(NameError::qualified(s, "missing namespace"));
        };
        if !is_identifier(name) {
            return Err(NameError::qualified(s, "type name is not an identifier"));
        }
        let namespace = namespace
            .parse()
            .map_err(|_| NameError::qualified(s, "namespace part is malformed"))?;
        Ok(Self::new(namespace, name))
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_key() {
        let key: NamespaceKey = "org.acme.hr".parse().unwrap();
        assert_eq!(key.name(), "org.acme.hr");
        assert!(key.version().is_none());
        assert_eq!(key.canonical(), "org.acme.hr");
    }

    #[test]
    fn test_parse_versioned_key() {
        let key: NamespaceKey = "person@1.0.0".parse().unwrap();
        assert_eq!(key.name(), "person");
        assert_eq!(key.version(), Some(&Version::new(1, 0, 0)));
        assert_eq!(key.canonical(), "person@1.0.0");
    }

    #[test]
    fn test_rejects_malformed_keys() {
        for text in ["", "org.", ".org", "org..acme", "org@", "org@1.0", "9org", "org-acme", "org@1.0.0@2.0.0"] {
            assert!(text.parse::<NamespaceKey>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_key_equality_follows_canonical_string() {
        let a: NamespaceKey = "test@1.0.0".parse().unwrap();
        let b = NamespaceKey::versioned("test", Version::new(1, 0, 0)).unwrap();
        let c: NamespaceKey = "test".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a, c);
    }

    #[test]
    fn test_qualified_name_splits_at_last_dot() {
        let fqn: QualifiedName = "org.acme@2.1.0-rc.1.Vehicle".parse().unwrap();
        assert_eq!(fqn.namespace().canonical(), "org.acme@2.1.0-rc.1");
        assert_eq!(fqn.name(), "Vehicle");
        assert_eq!(fqn.to_string(), "org.acme@2.1.0-rc.1.Vehicle");
    }

    #[test]
    fn test_qualified_name_rejects_missing_parts() {
        assert!("Person".parse::<QualifiedName>().is_err());
        assert!("person@1.0.0".parse::<QualifiedName>().is_err());
        assert!("test.".parse::<QualifiedName>().is_err());
    }

    #[test]
    fn test_qualify() {
        let key: NamespaceKey = "test".parse().unwrap();
        assert_eq!(key.qualify("Person").to_string(), "test.Person");
    }

    #[test]
    fn test_key_serialization() {
        let key: NamespaceKey = "hr@1.2.0".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""hr@1.2.0""#);
        let parsed: NamespaceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
