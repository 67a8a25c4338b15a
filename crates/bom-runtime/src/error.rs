//! Error types for the bom-runtime crate.
//!
//! This module provides [`RuntimeError`], the single error type returned by
//! registration, resolution, instantiation, and serialization.

/// Errors raised by the registry, resolvers, factory, and serializer.
///
/// Every failure is synchronous and leaves the registry unchanged. Messages
/// of the policy variants are part of the observable contract: hosts match on
/// `unversioned namespace`, `unversioned import`, and
/// `Namespace is not defined`.
///
/// # Examples
///
/// ```
/// use bom_runtime::RuntimeError;
///
/// fn describe(err: &RuntimeError) -> &'static str {
///     match err {
///         RuntimeError::UnversionedNamespace { .. }
///         | RuntimeError::UnversionedImport { .. } => "versioning policy",
///         RuntimeError::NamespaceNotDefined { .. } | RuntimeError::TypeNotFound { .. } => {
///             "unresolved reference"
///         }
///         _ => "other",
///     }
/// }
///
/// let err = RuntimeError::namespace_not_defined("test", "test.Person");
/// assert_eq!(describe(&err), "unresolved reference");
/// assert!(err.to_string().contains("Namespace is not defined"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuntimeError {
    /// Strict registry, model namespace without a version.
    #[error("cannot add unversioned namespace '{namespace}' to a registry that requires versions")]
    UnversionedNamespace {
        /// The rejected namespace.
        namespace: String,
    },

    /// Strict registry, import without a version.
    #[error(
        "cannot use unversioned import '{import}' in namespace '{namespace}': the registry requires versions"
    )]
    UnversionedImport {
        /// The namespace declaring the import.
        namespace: String,
        /// The import clause as written.
        import: String,
    },

    /// The canonical namespace key is already registered.
    #[error("namespace '{namespace}' is already registered")]
    DuplicateNamespace {
        /// The canonical key.
        namespace: String,
    },

    /// A namespace reference could not be resolved.
    #[error("Namespace is not defined: '{namespace}' (referenced by '{reference}')")]
    NamespaceNotDefined {
        /// The namespace part that failed to resolve.
        namespace: String,
        /// The type name, discriminator, or import that referenced it.
        reference: String,
    },

    /// The namespace resolved but does not declare the type.
    #[error("type '{type_name}' is not declared in namespace '{namespace}'")]
    TypeNotFound {
        /// The canonical key of the searched namespace.
        namespace: String,
        /// The missing declaration name.
        type_name: String,
    },

    /// `$class` is missing or not a string, or the payload is not an object.
    #[error("malformed $class discriminator: {reason}")]
    MalformedDiscriminator {
        /// What was wrong with the payload.
        reason: String,
    },

    /// Positional factory arguments do not fit the declared fields.
    #[error("type '{type_name}' takes {min} to {max} positional arguments but {found} were supplied")]
    ArityMismatch {
        /// The fully-qualified type name.
        type_name: String,
        /// Fewest arguments accepted.
        min: usize,
        /// Most arguments accepted.
        max: usize,
        /// Arguments supplied.
        found: usize,
    },

    /// The registered models are structurally inconsistent.
    #[error("invalid model: {reason}")]
    InvalidModel {
        /// Description of the defect.
        reason: String,
    },

    /// A field name that the type does not declare.
    #[error("field '{field}' is not declared by type '{type_name}'")]
    UnknownField {
        /// The fully-qualified type name.
        type_name: String,
        /// The undeclared field.
        field: String,
    },

    /// The factory was asked to instantiate an abstract declaration.
    #[error("cannot instantiate abstract type '{type_name}'")]
    AbstractType {
        /// The fully-qualified type name.
        type_name: String,
    },

    /// A JSON text could not be parsed or produced.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RuntimeError {
    /// Creates a new [`RuntimeError::NamespaceNotDefined`] error.
    #[inline]
    pub fn namespace_not_defined(namespace: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::NamespaceNotDefined {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// Creates a new [`RuntimeError::TypeNotFound`] error.
    #[inline]
    pub fn type_not_found(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::TypeNotFound {
            namespace: namespace.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates a new [`RuntimeError::MalformedDiscriminator`] error.
    #[inline]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDiscriminator {
            reason: reason.into(),
        }
    }

    /// Creates a new [`RuntimeError::InvalidModel`] error.
    #[inline]
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Creates a new [`RuntimeError::UnknownField`] error.
    #[inline]
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Returns `true` if the error comes from the strict versioning policy.
    #[inline]
    #[must_use]
    pub const fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::UnversionedNamespace { .. } | Self::UnversionedImport { .. }
        )
    }

    /// Returns the namespace the error is about, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::UnversionedNamespace { namespace }
            | Self::UnversionedImport { namespace, .. }
            | Self::DuplicateNamespace { namespace }
            | Self::NamespaceNotDefined { namespace, .. }
            | Self::TypeNotFound { namespace, .. } => Some(namespace),
            Self::MalformedDiscriminator { .. }
            | Self::ArityMismatch { .. }
            | Self::InvalidModel { .. }
            | Self::UnknownField { .. }
            | Self::AbstractType { .. }
            | Self::Json(_) => None,
        }
    }
}
