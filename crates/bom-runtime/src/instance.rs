//! Typed instances and their field values.

use bom_core::QualifiedName;
use rustc_hash::FxHashMap;

/// A field value.
///
/// Scalars mirror JSON; nested objects are always typed instances.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// Any JSON number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A nested instance.
    Instance(Box<Instance>),
}

impl Value {
    /// Returns the string, if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number as `f64`, if this is a [`Value::Number`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the number as `i64`, if it is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the elements, if this is a [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested instance, if this is a [`Value::Instance`].
    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become [`Value::Null`].
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Self::Instance(Box::new(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

/// An object bound to a registered declaration.
///
/// Instances are created by the [`Factory`](crate::Factory) or decoded by the
/// [`Serializer`](crate::Serializer); the bound type never changes after
/// construction. Field values are stored by name, and unset fields are simply
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    bound_type: QualifiedName,
    identified_by: Option<String>,
    fields: FxHashMap<String, Value>,
}

impl Instance {
    pub(crate) fn new(bound_type: QualifiedName, identified_by: Option<String>) -> Self {
        Self {
            bound_type,
            identified_by,
            fields: FxHashMap::default(),
        }
    }

    pub(crate) fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// The fully-qualified name of the declaration this instance is bound to.
    #[inline]
    #[must_use]
    pub const fn bound_type(&self) -> &QualifiedName {
        &self.bound_type
    }

    /// The value of `field`, if set.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The name of the identifying field, for identified types.
    #[inline]
    #[must_use]
    pub fn identifying_field(&self) -> Option<&str> {
        self.identified_by.as_deref()
    }

    /// The value of the identifying field, if the type has one and it is set.
    #[must_use]
    pub fn identifier(&self) -> Option<&Value> {
        self.identified_by.as_deref().and_then(|f| self.get(f))
    }

    /// Set fields, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of set fields.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
