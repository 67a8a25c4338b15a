//! The parser hand-off record.
//!
//! Turning model source text into namespaces, imports, and declarations is
//! the job of an external parser. [`ParsedModel`] is what it hands to the
//! registry.

use serde::{Deserialize, Serialize};

use super::declaration::Declaration;
use super::import::Import;
use super::namespace::NamespaceKey;

/// A parsed model source: one namespace with its imports and declarations.
///
/// # Examples
///
/// ```
/// use bom_core::{Declaration, Field, ParsedModel, PrimitiveType};
///
/// // namespace test
/// // concept Person identified by email { o String email }
/// let model = ParsedModel::new("test".parse()?)
///     .with_origin("person.cto")
///     .with_declaration(
///         Declaration::concept("Person")
///             .identified_by("email")
///             .with_field(Field::primitive("email", PrimitiveType::String)),
///     );
///
/// assert_eq!(model.namespace.canonical(), "test");
/// assert_eq!(model.declarations.len(), 1);
/// # Ok::<(), bom_core::NameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModel {
    /// The declared namespace, with its version if the source gave one.
    pub namespace: NamespaceKey,

    /// Import statements in source order.
    #[serde(default)]
    pub imports: Vec<Import>,

    /// Declarations in source order.
    #[serde(default)]
    pub declarations: Vec<Declaration>,

    /// Where the model came from (a file name, URL, ...). Opaque to the registry.
    #[serde(default)]
    pub origin: Option<String>,
}

impl ParsedModel {
    /// Creates an empty model for `namespace`.
    #[must_use]
    pub const fn new(namespace: NamespaceKey) -> Self {
        Self {
            namespace,
            imports: Vec::new(),
            declarations: Vec::new(),
            origin: None,
        }
    }

    /// Appends an import.
    #[must_use]
    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    /// Appends a declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Records where the model came from.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::declaration::{Field, PrimitiveType};

    #[test]
    fn test_builder_preserves_order() {
        let model = ParsedModel::new("hr@1.0.0".parse().unwrap())
            .with_import("import {Event} from concerto@1.0.0".parse().unwrap())
            .with_import("org.acme.*".parse().unwrap())
            .with_declaration(Declaration::concept("A"))
            .with_declaration(Declaration::concept("B"));

        assert_eq!(model.imports[0].to_string(), "concerto@1.0.0.Event");
        assert_eq!(model.imports[1].to_string(), "org.acme.*");
        let names: Vec<_> = model.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(model.origin.is_none());
    }

    #[test]
    fn test_json_hand_off() {
        let json = r#"{
            "namespace": "person@1.0.0",
            "imports": [{"namespace": "concerto@1.0.0", "target": {"types": ["Event"]}}],
            "declarations": [{
                "name": "Person",
                "identified_by": "email",
                "fields": [{"name": "email", "field_type": {"primitive": "String"}}]
            }],
            "origin": "person.cto"
        }"#;
        let model: ParsedModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.namespace.canonical(), "person@1.0.0");
        assert!(model.imports[0].names_type("Event"));
        assert_eq!(
            model.declarations[0].fields[0],
            Field::primitive("email", PrimitiveType::String)
        );
        assert_eq!(model.origin.as_deref(), Some("person.cto"));
    }
}
