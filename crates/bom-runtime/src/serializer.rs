//! The canonical JSON encoding.
//!
//! An instance encodes as a JSON object whose first key is [`CLASS_KEY`],
//! carrying the fully-qualified name of its bound type, followed by its set
//! fields in declaration order (inherited fields first):
//!
//! ```json
//! { "$class": "test.Person", "email": "john.doe@example.com" }
//! ```
//!
//! Nested instances carry their own `$class`. Decoding resolves every
//! discriminator through the [`TypeResolver`](crate::TypeResolver), so the
//! strict versioning policy applies to payloads exactly as it does to
//! lookups.

use bom_core::QualifiedName;
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::RuntimeError;
use crate::instance::{Instance, Value};
use crate::registry::ModelManager;

/// The discriminator key.
pub const CLASS_KEY: &str = "$class";

/// Converts instances to and from JSON.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    manager: &'a ModelManager,
}

impl<'a> Serializer<'a> {
    pub(crate) const fn new(manager: &'a ModelManager) -> Self {
        Self { manager }
    }

    /// Encodes an instance.
    ///
    /// # Errors
    ///
    /// Resolution errors if the bound type of this or a nested instance no
    /// longer resolves.
    pub fn to_json(&self, instance: &Instance) -> Result<Json, RuntimeError> {
        let resolver = self.manager.type_resolver();
        let declaration = resolver.resolve_qualified(instance.bound_type())?;

        let mut object = Map::new();
        object.insert(
            CLASS_KEY.to_owned(),
            Json::String(instance.bound_type().to_string()),
        );
        for field in resolver.fields(declaration)? {
            if let Some(value) = instance.get(&field.name) {
                object.insert(field.name.clone(), self.encode_value(value)?);
            }
        }
        Ok(Json::Object(object))
    }

    /// Encodes an instance as JSON text.
    ///
    /// # Errors
    ///
    /// See [`Serializer::to_json`].
    pub fn to_json_string(&self, instance: &Instance) -> Result<String, RuntimeError> {
        Ok(serde_json::to_string(&self.to_json(instance)?)?)
    }

    fn encode_value(&self, value: &Value) -> Result<Json, RuntimeError> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => Json::Number(n.clone()),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.encode_value(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Instance(nested) => self.to_json(nested)?,
        })
    }

    /// Decodes an instance.
    ///
    /// The discriminator is validated before any field is read. The
    /// identifying field, if the type has one, must be present.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::MalformedDiscriminator`] if the payload is not an
    ///   object or `$class` is missing or not a string
    /// - [`RuntimeError::NamespaceNotDefined`] or
    ///   [`RuntimeError::TypeNotFound`] if `$class` does not resolve
    /// - [`RuntimeError::UnknownField`] for keys the type does not declare
    /// - [`RuntimeError::ArityMismatch`] if the identifying field is missing
    pub fn from_json(&self, payload: &Json) -> Result<Instance, RuntimeError> {
        let Json::Object(object) = payload else {
            return Err(RuntimeError::malformed("payload is not a JSON object"));
        };
        let class = match object.get(CLASS_KEY) {
            Some(Json::String(class)) => class,
            Some(_) => return Err(RuntimeError::malformed("$class is not a string")),
            None => return Err(RuntimeError::malformed("missing $class")),
        };

        let resolver = self.manager.type_resolver();
        let declaration = resolver.resolve(class)?;
        let bound_type: QualifiedName = declaration
            .qualified_name()
            .ok_or_else(|| RuntimeError::type_not_found(class.as_str(), declaration.name.as_str()))?;
        let fields = resolver.fields(declaration)?;

        for key in object.keys() {
            if key != CLASS_KEY && !fields.iter().any(|f| &f.name == key) {
                return Err(RuntimeError::unknown_field(bound_type.to_string(), key.as_str()));
            }
        }

        let identified_by = resolver.identifying_field(declaration)?;
        let args = match identified_by.and_then(|id| object.get(id)) {
            Some(id) => vec![self.decode_value(id)?],
            None => Vec::new(),
        };
        let mut instance = self.manager.factory().instantiate(declaration, args)?;

        for field in &fields {
            if Some(field.name.as_str()) == identified_by {
                continue;
            }
            if let Some(value) = object.get(&field.name) {
                instance.set(field.name.as_str(), self.decode_value(value)?);
            }
        }

        debug!(bound_type = %bound_type, fields = instance.field_count(), "Decoded instance");
        Ok(instance)
    }

    /// Decodes an instance from JSON text.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Json`] for malformed text; otherwise see
    /// [`Serializer::from_json`].
    pub fn from_json_str(&self, text: &str) -> Result<Instance, RuntimeError> {
        let payload: Json = serde_json::from_str(text)?;
        self.from_json(&payload)
    }

    fn decode_value(&self, value: &Json) -> Result<Value, RuntimeError> {
        Ok(match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.clone()),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.decode_value(item))
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(_) => Value::from(self.from_json(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use bom_core::{Declaration, Field, ParsedModel, PrimitiveType};
    use serde_json::json;

    use super::*;

    fn manager() -> ModelManager {
        let mut manager = ModelManager::default();
        manager
            .add_model(
                ParsedModel::new("crm@1.0.0".parse().unwrap())
                    .with_declaration(
                        Declaration::concept("Address")
                            .with_field(Field::primitive("street", PrimitiveType::String))
                            .with_field(Field::primitive("city", PrimitiveType::String)),
                    )
                    .with_declaration(
                        Declaration::concept("Customer")
                            .identified_by("id")
                            .with_field(Field::primitive("name", PrimitiveType::String))
                            .with_field(Field::primitive("id", PrimitiveType::Long))
                            .with_field(Field::declared("addresses", "Address").array())
                            .with_field(Field::primitive("active", PrimitiveType::Boolean).optional()),
                    ),
            )
            .unwrap();
        manager
    }

    #[test]
    fn test_encode_orders_class_then_declared_fields() {
        let manager = manager();
        let factory = manager.factory();

        let mut address = factory.new_concept("crm@1.0.0", "Address", Vec::new()).unwrap();
        factory.assign(&mut address, "city", "Oslo").unwrap();

        let mut customer = factory
            .new_concept("crm@1.0.0", "Customer", vec![Value::from(7_i64), Value::from("Acme")])
            .unwrap();
        factory
            .assign(&mut customer, "addresses", vec![Value::from(address)])
            .unwrap();

        insta::assert_json_snapshot!(manager.serializer().to_json(&customer).unwrap(), @r#"
        {
          "$class": "crm@1.0.0.Customer",
          "name": "Acme",
          "id": 7,
          "addresses": [
            {
              "$class": "crm@1.0.0.Address",
              "city": "Oslo"
            }
          ]
        }
        "#);
    }

    #[test]
    fn test_round_trip_nested() {
        let manager = manager();
        let serializer = manager.serializer();
        let payload = json!({
            "$class": "crm@1.0.0.Customer",
            "id": 7,
            "name": "Acme",
            "addresses": [{"$class": "crm@1.0.0.Address", "street": "Storgata 1"}],
            "active": null,
        });

        let customer = serializer.from_json(&payload).unwrap();
        assert_eq!(customer.identifier().and_then(Value::as_i64), Some(7));
        let nested = customer
            .get("addresses")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_instance)
            .unwrap();
        assert_eq!(nested.bound_type().to_string(), "crm@1.0.0.Address");

        let again = serializer.from_json(&serializer.to_json(&customer).unwrap()).unwrap();
        assert_eq!(again, customer);
    }

    #[test]
    fn test_malformed_discriminator() {
        let manager = manager();
        let serializer = manager.serializer();
        for payload in [
            json!({"name": "Acme"}),
            json!({"$class": 3}),
            json!(["crm@1.0.0.Customer"]),
            json!("crm@1.0.0.Customer"),
        ] {
            assert!(
                matches!(
                    serializer.from_json(&payload),
                    Err(RuntimeError::MalformedDiscriminator { .. })
                ),
                "accepted {payload}"
            );
        }
    }

    #[test]
    fn test_nested_object_without_class_is_rejected() {
        let manager = manager();
        let payload = json!({
            "$class": "crm@1.0.0.Customer",
            "id": 1,
            "addresses": [{"city": "Oslo"}],
        });
        assert!(matches!(
            manager.serializer().from_json(&payload),
            Err(RuntimeError::MalformedDiscriminator { .. })
        ));
    }

    #[test]
    fn test_strict_decode_reports_unknown_namespace_first() {
        let mut manager = ModelManager::strict();
        manager
            .add_model(
                ParsedModel::new("person@1.0.0".parse().unwrap())
                    .with_declaration(Declaration::concept("Person")),
            )
            .unwrap();

        for class in ["test.Per son", "nowhere@9.9.9.Bad-Name", "person.Person"] {
            let payload = json!({"$class": class});
            assert!(
                matches!(
                    manager.serializer().from_json(&payload),
                    Err(RuntimeError::NamespaceNotDefined { .. })
                ),
                "wrong error for {class}"
            );
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let manager = manager();
        let payload = json!({"$class": "crm@1.0.0.Address", "country": "NO"});
        let err = manager.serializer().from_json(&payload).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownField { ref field, .. } if field == "country"));
    }

    #[test]
    fn test_missing_identifier_is_arity_mismatch() {
        let manager = manager();
        let payload = json!({"$class": "crm@1.0.0.Customer", "name": "Acme"});
        assert!(matches!(
            manager.serializer().from_json(&payload),
            Err(RuntimeError::ArityMismatch { found: 0, .. })
        ));
    }

    #[test]
    fn test_text_api() {
        let manager = manager();
        let serializer = manager.serializer();

        let address = serializer
            .from_json_str(r#"{"$class": "crm@1.0.0.Address", "city": "Bergen"}"#)
            .unwrap();
        assert_eq!(
            serializer.to_json_string(&address).unwrap(),
            r#"{"$class":"crm@1.0.0.Address","city":"Bergen"}"#
        );
        assert!(matches!(
            serializer.from_json_str("{not json"),
            Err(RuntimeError::Json(_))
        ));
    }
}
