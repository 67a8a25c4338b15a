//! Import declarations of a model file.
//!
//! A model file may pull declarations from other namespaces. Three syntactic
//! shapes reach this crate from the parser:
//!
//! | Shape | Example | Target |
//! |---|---|---|
//! | Wildcard | `import org.acme.*`, `import hr@1.0.0.*` | every declaration |
//! | Single type | `import org.acme.Vehicle`, `import hr@1.0.0.Person` | one declaration |
//! | Type list | `import {Event, Asset} from concerto@1.0.0` | the listed declarations |
//!
//! Any of them may carry a version qualifier on the namespace. A clause with
//! no `.*` or type list imports the whole namespace (`import org.acme`).
//!
//! In the single-type form the last segment is a type only if it starts with
//! an uppercase ASCII letter, so `import org.acme` names the `org.acme`
//! namespace and `import hr@1.0.0-rc.beta` keeps its pre-release intact. A
//! lowercase type name is imported with the list form: `{acme} from org`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::namespace::{NamespaceKey, is_identifier};
use crate::error::NameError;

/// What an import brings into scope from its target namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportTarget {
    /// Every declaration of the namespace: `import ns.*`.
    Wildcard,

    /// Named declarations: `import ns.Type` or `import {A, B} from ns`.
    ///
    /// Most imports name a single type, so four inline slots avoid a heap
    /// allocation in the common case.
    Types(SmallVec<[String; 4]>),
}

/// An import statement of a model file.
///
/// # Examples
///
/// ```
/// use bom_core::Import;
///
/// let import: Import = "import {Event} from concerto@1.0.0".parse()?;
/// assert!(import.is_versioned());
/// assert!(import.names_type("Event"));
/// assert_eq!(import.namespace().canonical(), "concerto@1.0.0");
///
/// let wildcard: Import = "org.acme.*".parse()?;
/// assert!(wildcard.is_wildcard());
/// assert!(!wildcard.is_versioned());
/// # Ok::<(), bom_core::NameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Import {
    namespace: NamespaceKey,
    target: ImportTarget,
}

impl Import {
    /// Creates a wildcard import of `namespace`.
    #[must_use]
    pub const fn wildcard(namespace: NamespaceKey) -> Self {
        Self {
            namespace,
            target: ImportTarget::Wildcard,
        }
    }

    /// Creates an import of a single declaration.
    #[must_use]
    pub fn single(namespace: NamespaceKey, type_name: impl Into<String>) -> Self {
        let mut names = SmallVec::new();
        names.push(type_name.into());
        Self {
            namespace,
            target: ImportTarget::Types(names),
        }
    }

    /// Creates an import of several declarations.
    #[must_use]
    pub fn types<I, S>(namespace: NamespaceKey, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace,
            target: ImportTarget::Types(type_names.into_iter().map(Into::into).collect()),
        }
    }

    /// The namespace being imported from, exactly as written.
    #[inline]
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceKey {
        &self.namespace
    }

    /// What the import brings into scope.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> &ImportTarget {
        &self.target
    }

    /// Returns `true` if the import carries a version qualifier.
    #[inline]
    #[must_use]
    pub const fn is_versioned(&self) -> bool {
        self.namespace.is_versioned()
    }

    /// Returns `true` for `ns.*` imports.
    #[inline]
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.target, ImportTarget::Wildcard)
    }

    /// The explicitly named declarations; empty for wildcard imports.
    #[must_use]
    pub fn type_names(&self) -> &[String] {
        match &self.target {
            ImportTarget::Wildcard => &[],
            ImportTarget::Types(names) => names,
        }
    }

    /// Returns `true` if the import names `type_name` explicitly.
    ///
    /// Wildcard imports name nothing explicitly; whether they supply a type
    /// depends on what the target namespace declares.
    #[must_use]
    pub fn names_type(&self, type_name: &str) -> bool {
        self.type_names().iter().any(|name| name == type_name)
    }
}

impl FromStr for Import {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clause = s.trim();
        let clause = clause.strip_prefix("import ").unwrap_or(clause).trim();

        if let Some(list) = clause.strip_prefix('{') {
            let Some((names, rest)) = list.split_once('}') else {
                return Err(NameError::import(s, "unterminated type list"));
            };
            let Some(namespace) = rest.trim_start().strip_prefix("from ") else {
                return Err(NameError::import(s, "expected 'from' after type list"));
            };
            let names: SmallVec<[String; 4]> =
                names.split(',').map(|n| n.trim().to_owned()).collect();
            if !names.iter().all(|n| is_identifier(n)) {
                return Err(NameError::import(s, "type list entries must be identifiers"));
            }
            let namespace = namespace
                .trim()
                .parse()
                .map_err(|_| NameError::import(s, "malformed namespace"))?;
            return Ok(Self {
                namespace,
                target: ImportTarget::Types(names),
            });
        }

        if let Some((namespace, last)) = clause.rsplit_once('.') {
            if last == "*" {
                let namespace = namespace
                    .parse()
                    .map_err(|_| NameError::import(s, "malformed namespace"))?;
                return Ok(Self::wildcard(namespace));
            }
            if is_type_segment(last) {
                if let Ok(namespace) = namespace.parse() {
                    return Ok(Self::single(namespace, last));
                }
            }
        }

        // `import ns` or `import ns@1.0.0`: the whole namespace
        clause
            .parse()
            .map(Self::wildcard)
            .map_err(|_| NameError::import(s, "expected ns.*, ns.Type, or {Types} from ns"))
    }
}

/// Whether the last dotted segment of an import clause reads as a type name.
fn is_type_segment(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_uppercase()) && is_identifier(segment)
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            ImportTarget::Wildcard => write!(f, "{}.*", self.namespace),
            ImportTarget::Types(names) if names.len() == 1 && is_type_segment(&names[0]) => {
                write!(f, "{}.{}", self.namespace, names[0])
            }
            ImportTarget::Types(names) => {
                write!(f, "{{{}}} from {}", names.join(", "), self.namespace)
            }
        }
    }
}
