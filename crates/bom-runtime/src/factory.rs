//! Instance construction.

use bom_core::{Declaration, NamespaceKey};
use tracing::debug;

use crate::error::RuntimeError;
use crate::instance::{Instance, Value};
use crate::registry::ModelManager;

/// Creates instances bound to registered declarations.
///
/// # Positional arguments
///
/// The slots of a type are its identifying field (if it has one) followed by
/// every other field, inherited fields first, in declaration order. An
/// identified type needs at least its identifier; no type accepts more
/// arguments than it has slots. Unfilled fields stay unset.
///
/// ```
/// use bom_core::{Declaration, Field, ParsedModel, PrimitiveType};
/// use bom_runtime::{ModelManager, Value};
///
/// let mut manager = ModelManager::default();
/// manager.add_model(ParsedModel::new("test".parse()?).with_declaration(
///     Declaration::concept("Person")
///         .identified_by("email")
///         .with_field(Field::primitive("email", PrimitiveType::String)),
/// ))?;
///
/// let person = manager
///     .factory()
///     .new_concept("test", "Person", vec![Value::from("john.doe@example.com")])?;
/// assert_eq!(person.bound_type().to_string(), "test.Person");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Factory<'a> {
    manager: &'a ModelManager,
}

impl<'a> Factory<'a> {
    pub(crate) const fn new(manager: &'a ModelManager) -> Self {
        Self { manager }
    }

    /// Instantiates `namespace`.`type_name` with positional arguments.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::TypeNotFound`] if `namespace` is not registered or
    ///   does not declare `type_name`
    /// - [`RuntimeError::AbstractType`] for abstract declarations
    /// - [`RuntimeError::ArityMismatch`] if the arguments do not fit the slots
    /// - [`RuntimeError::InvalidModel`] for inconsistent declarations
    ///
    /// Failures while walking the supertype chain are returned unchanged.
    pub fn new_concept(
        &self,
        namespace: &str,
        type_name: &str,
        args: Vec<Value>,
    ) -> Result<Instance, RuntimeError> {
        let declaration = self.resolve(namespace, type_name)?;
        self.instantiate(declaration, args)
    }

    /// Finds the requested declaration, then checks its supertype chain.
    ///
    /// Only a failure to find the requested type itself becomes
    /// `TypeNotFound`; errors from its supertypes keep their own kind.
    fn resolve(&self, namespace: &str, type_name: &str) -> Result<&'a Declaration, RuntimeError> {
        let not_found = || RuntimeError::type_not_found(namespace, type_name);
        let resolver = self.manager.type_resolver();

        let key: NamespaceKey = namespace.parse().map_err(|_| not_found())?;
        let declaration = resolver
            .resolve_namespace(&key, namespace)
            .ok()
            .and_then(|file| file.declaration(type_name))
            .ok_or_else(not_found)?;
        resolver.supertype_chain(declaration)?;
        Ok(declaration)
    }

    /// Instantiates a resolved declaration.
    pub(crate) fn instantiate(
        &self,
        declaration: &'a Declaration,
        args: Vec<Value>,
    ) -> Result<Instance, RuntimeError> {
        let resolver = self.manager.type_resolver();
        let bound_type = declaration.qualified_name().ok_or_else(|| {
            RuntimeError::invalid_model(format!("declaration '{}' is not registered", declaration.name))
        })?;

        if declaration.is_abstract {
            return Err(RuntimeError::AbstractType {
                type_name: bound_type.to_string(),
            });
        }

        let fields = resolver.fields(declaration)?;
        let identified_by = resolver.identifying_field(declaration)?;

        let slots: Vec<&str> = identified_by
            .into_iter()
            .chain(
                fields
                    .iter()
                    .map(|f| f.name.as_str())
                    .filter(|&name| Some(name) != identified_by),
            )
            .collect();

        let min = usize::from(identified_by.is_some());
        if args.len() < min || args.len() > slots.len() {
            return Err(RuntimeError::ArityMismatch {
                type_name: bound_type.to_string(),
                min,
                max: slots.len(),
                found: args.len(),
            });
        }

        let mut instance = Instance::new(bound_type, identified_by.map(str::to_owned));
        for (slot, value) in slots.into_iter().zip(args) {
            instance.set(slot, value);
        }
        debug!(
            bound_type = %instance.bound_type(),
            fields = instance.field_count(),
            "Instantiated type"
        );
        Ok(instance)
    }

    /// Sets a declared field of `instance`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownField`] if the bound type does not declare
    /// `field`; resolution errors if the bound type no longer resolves.
    pub fn assign(
        &self,
        instance: &mut Instance,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), RuntimeError> {
        let resolver = self.manager.type_resolver();
        let declaration = resolver.resolve_qualified(instance.bound_type())?;
        if !resolver.fields(declaration)?.iter().any(|f| f.name == field) {
            return Err(RuntimeError::unknown_field(
                instance.bound_type().to_string(),
                field,
            ));
        }
        instance.set(field, value.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bom_core::{DeclarationKind, Field, ParsedModel, PrimitiveType, RegistryConfig};

    use super::*;

    fn manager() -> ModelManager {
        let mut manager = ModelManager::default();
        manager
            .add_model(
                ParsedModel::new("hr@1.0.0".parse().unwrap())
                    .with_declaration(
                        Declaration::new(DeclarationKind::Participant, "Person")
                            .into_abstract()
                            .identified_by("email")
                            .with_field(Field::primitive("email", PrimitiveType::String))
                            .with_field(Field::primitive("name", PrimitiveType::String)),
                    )
                    .with_declaration(
                        Declaration::new(DeclarationKind::Participant, "Employee")
                            .extends("Person")
                            .with_field(Field::primitive("salary", PrimitiveType::Double)),
                    )
                    .with_declaration(
                        Declaration::concept("Address")
                            .with_field(Field::primitive("city", PrimitiveType::String)),
                    )
                    .with_declaration(
                        Declaration::concept("Broken")
                            .identified_by("missing")
                            .with_field(Field::primitive("x", PrimitiveType::String)),
                    ),
            )
            .unwrap();
        manager
    }

    #[test]
    fn test_positional_slots_follow_identifier_then_fields() {
        let manager = manager();
        let employee = manager
            .factory()
            .new_concept(
                "hr@1.0.0",
                "Employee",
                vec![Value::from("ann@example.com"), Value::from("Ann"), Value::from(100.0)],
            )
            .unwrap();

        assert_eq!(employee.bound_type().to_string(), "hr@1.0.0.Employee");
        assert_eq!(employee.identifying_field(), Some("email"));
        assert_eq!(employee.get("name").and_then(Value::as_str), Some("Ann"));
        assert_eq!(employee.get("salary").and_then(Value::as_f64), Some(100.0));
    }

    #[test]
    fn test_unfilled_fields_stay_unset() {
        let manager = manager();
        let employee = manager
            .factory()
            .new_concept("hr@1.0.0", "Employee", vec![Value::from("ann@example.com")])
            .unwrap();
        assert_eq!(employee.field_count(), 1);
        assert!(employee.get("salary").is_none());
    }

    #[test]
    fn test_arity_mismatch() {
        let manager = manager();
        let factory = manager.factory();

        let err = factory.new_concept("hr@1.0.0", "Employee", Vec::new()).unwrap_err();
        assert!(matches!(err, RuntimeError::ArityMismatch { min: 1, max: 3, found: 0, .. }));

        let args = vec![Value::from("a"), Value::from("b"), Value::from(1.0), Value::Null];
        let err = factory.new_concept("hr@1.0.0", "Employee", args).unwrap_err();
        assert!(matches!(err, RuntimeError::ArityMismatch { found: 4, .. }));

        // unidentified types accept zero arguments
        assert!(factory.new_concept("hr@1.0.0", "Address", Vec::new()).is_ok());
    }

    #[test]
    fn test_abstract_and_unresolved_types() {
        let manager = manager();
        let factory = manager.factory();

        assert!(matches!(
            factory.new_concept("hr@1.0.0", "Person", vec![Value::from("x")]).unwrap_err(),
            RuntimeError::AbstractType { .. }
        ));
        assert!(matches!(
            factory.new_concept("hr@1.0.0", "Manager", Vec::new()).unwrap_err(),
            RuntimeError::TypeNotFound { .. }
        ));
        assert!(matches!(
            factory.new_concept("hr", "Address", Vec::new()).unwrap_err(),
            RuntimeError::TypeNotFound { .. }
        ));
        assert!(matches!(
            factory.new_concept("hr@1.0.0", "Broken", vec![Value::from("x")]).unwrap_err(),
            RuntimeError::InvalidModel { .. }
        ));
    }

    #[test]
    fn test_supertype_errors_keep_their_kind() {
        let mut manager = ModelManager::default();
        manager
            .add_model(
                ParsedModel::new("hr@1.0.0".parse().unwrap()).with_declaration(
                    Declaration::concept("Employee")
                        .extends("org@1.0.0.Base")
                        .with_field(Field::primitive("name", PrimitiveType::String)),
                ),
            )
            .unwrap();

        let err = manager
            .factory()
            .new_concept("hr@1.0.0", "Employee", Vec::new())
            .unwrap_err();
        assert!(
            matches!(err, RuntimeError::NamespaceNotDefined { ref namespace, .. } if namespace == "org@1.0.0"),
            "{err}"
        );
    }

    #[test]
    fn test_bound_type_uses_resolved_key() {
        let mut manager = ModelManager::new(RegistryConfig::default());
        manager
            .add_model(
                ParsedModel::new("person@1.0.0".parse().unwrap()).with_declaration(
                    Declaration::concept("Person")
                        .identified_by("email")
                        .with_field(Field::primitive("email", PrimitiveType::String)),
                ),
            )
            .unwrap();
        let person = manager
            .factory()
            .new_concept("person@1.0.0", "Person", vec![Value::from("john.doe@example.com")])
            .unwrap();
        assert_eq!(person.bound_type().to_string(), "person@1.0.0.Person");
    }

    #[test]
    fn test_assign() {
        let manager = manager();
        let factory = manager.factory();
        let mut address = factory.new_concept("hr@1.0.0", "Address", Vec::new()).unwrap();

        factory.assign(&mut address, "city", "Oslo").unwrap();
        assert_eq!(address.get("city").and_then(Value::as_str), Some("Oslo"));

        let err = factory.assign(&mut address, "zip", "0150").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownField { ref field, .. } if field == "zip"));
    }
}
