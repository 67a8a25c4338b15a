//! Declarations: the named, field-bearing types of a namespace.
//!
//! The parser produces these; the registry binds each one to the namespace it
//! is registered under. Field types and cardinality are carried as metadata
//! for hosts. The registry checks field names, not field values.

use serde::{Deserialize, Serialize};

use super::namespace::{NamespaceKey, QualifiedName};

/// The kind of a declaration.
///
/// All kinds are instantiable through the factory unless the declaration is
/// abstract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DeclarationKind {
    /// `concept Foo { }`
    #[default]
    Concept,
    /// `asset Foo identified by id { }`
    Asset,
    /// `participant Foo identified by id { }`
    Participant,
    /// `transaction Foo { }`
    Transaction,
    /// `event Foo { }`
    Event,
}

impl DeclarationKind {
    /// The model-language keyword for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use bom_core::DeclarationKind;
    ///
    /// assert_eq!(DeclarationKind::Participant.keyword(), "participant");
    /// ```
    #[inline]
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Asset => "asset",
            Self::Participant => "participant",
            Self::Transaction => "transaction",
            Self::Event => "event",
        }
    }
}

/// Built-in scalar types of the modeling language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PrimitiveType {
    /// `String`
    String,
    /// `Boolean`
    Boolean,
    /// `DateTime`
    DateTime,
    /// `Double`
    Double,
    /// `Integer`
    Integer,
    /// `Long`
    Long,
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A built-in scalar.
    Primitive(PrimitiveType),

    /// Another declaration, by short name or fully-qualified name.
    Declared(String),
}

/// A field of a declaration.
///
/// # Examples
///
/// ```
/// use bom_core::{Field, FieldType, PrimitiveType};
///
/// let email = Field::primitive("email", PrimitiveType::String);
/// assert_eq!(email.field_type, FieldType::Primitive(PrimitiveType::String));
///
/// let address = Field::declared("address", "Address").optional();
/// assert!(address.is_optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// The field name.
    pub name: String,

    /// The declared type.
    pub field_type: FieldType,

    /// `true` for `Type[] name` fields.
    #[serde(default)]
    pub is_array: bool,

    /// `true` for fields marked `optional`.
    #[serde(default)]
    pub is_optional: bool,
}

impl Field {
    /// Creates a required scalar field.
    #[must_use]
    pub fn primitive(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Primitive(primitive),
            is_array: false,
            is_optional: false,
        }
    }

    /// Creates a required field typed by another declaration.
    #[must_use]
    pub fn declared(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Declared(type_name.into()),
            is_array: false,
            is_optional: false,
        }
    }

    /// Marks the field as an array.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// A named type definition inside a namespace.
///
/// `namespace` is `None` until the declaration is registered; the registry
/// then binds it to the owning model's key.
///
/// # Examples
///
/// ```
/// use bom_core::{Declaration, Field, PrimitiveType};
///
/// let person = Declaration::concept("Person")
///     .identified_by("email")
///     .with_field(Field::primitive("email", PrimitiveType::String))
///     .with_field(Field::primitive("name", PrimitiveType::String));
///
/// assert_eq!(person.identified_by.as_deref(), Some("email"));
/// assert!(person.field("name").is_some());
/// assert!(person.qualified_name().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// The short declaration name.
    pub name: String,

    /// The declaration kind.
    #[serde(default)]
    pub kind: DeclarationKind,

    /// The owning namespace, bound at registration.
    #[serde(default)]
    pub namespace: Option<NamespaceKey>,

    /// Fields declared directly on this type, in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,

    /// The identifying field, for `identified by` declarations.
    #[serde(default)]
    pub identified_by: Option<String>,

    /// The supertype, by short name or fully-qualified name.
    #[serde(default)]
    pub super_type: Option<String>,

    /// `true` for `abstract` declarations.
    #[serde(default)]
    pub is_abstract: bool,
}

impl Declaration {
    /// Creates an empty declaration of the given kind.
    #[must_use]
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace: None,
            fields: Vec::new(),
            identified_by: None,
            super_type: None,
            is_abstract: false,
        }
    }

    /// Creates an empty `concept` declaration.
    #[must_use]
    pub fn concept(name: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Concept, name)
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the identifying field.
    #[must_use]
    pub fn identified_by(mut self, field: impl Into<String>) -> Self {
        self.identified_by = Some(field.into());
        self
    }

    /// Sets the supertype reference.
    #[must_use]
    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    /// Marks the declaration abstract.
    #[must_use]
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Looks up a field declared directly on this type.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The fully-qualified name, once the declaration is bound to a namespace.
    #[must_use]
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        self.namespace.as_ref().map(|ns| ns.qualify(&self.name))
    }
}
