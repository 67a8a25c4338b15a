//! Model registry, type resolution, and JSON serialization for
//! business-object models.
//!
//! A host registers parsed models (see [`bom_core::ParsedModel`]) with a
//! [`ModelManager`], then uses the borrowed components it hands out to look
//! up types, build instances, and move them across the wire.
//!
//! # Overview
//!
//! - [`ModelManager`]: registry of [`ModelFile`]s keyed by canonical
//!   namespace (`name` or `name@version`), enforcing the versioning policy
//! - [`ImportResolver`]: lazy, cached resolution of import statements
//! - [`TypeResolver`]: fully-qualified names, short-name references, and
//!   supertype chains
//! - [`Factory`]: positional construction of [`Instance`]s
//! - [`Serializer`]: the `$class`-tagged JSON encoding
//!
//! # Example
//!
//! ```
//! use bom_core::{Declaration, Field, ParsedModel, PrimitiveType, RegistryConfig};
//! use bom_runtime::{ModelManager, Value};
//!
//! let mut manager = ModelManager::new(RegistryConfig::default());
//! manager.add_model(ParsedModel::new("test".parse()?).with_declaration(
//!     Declaration::concept("Person")
//!         .identified_by("email")
//!         .with_field(Field::primitive("email", PrimitiveType::String)),
//! ))?;
//!
//! let person = manager
//!     .factory()
//!     .new_concept("test", "Person", vec![Value::from("john.doe@example.com")])?;
//! let json = manager.serializer().to_json(&person)?;
//! assert_eq!(json["$class"], "test.Person");
//!
//! let decoded = manager.serializer().from_json(&json)?;
//! assert_eq!(decoded, person);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Versioning policy
//!
//! With [`RegistryConfig::versioned_namespaces_strict`] set, every namespace
//! and every import must carry a version, and a bare namespace in a type
//! reference or `$class` never resolves, even if a versioned namespace of the
//! same name is registered. Lenient registries accept both conventions and
//! resolve each by exact key; there is no "latest version" fallback.
//!
//! [`RegistryConfig::versioned_namespaces_strict`]: bom_core::RegistryConfig::versioned_namespaces_strict
//!
//! # Architecture
//!
//! ```text
//! ModelManager (owns ModelFiles)
//!     │
//!     ├── ImportResolver ── per-file RwLock cache
//!     │
//!     ├── TypeResolver ──── uses ImportResolver for cross-namespace refs
//!     │
//!     ├── Factory ───────── uses TypeResolver for fields and identity
//!     │
//!     └── Serializer ────── uses TypeResolver + Factory
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod factory;
mod instance;
mod model_file;
mod registry;
mod resolver;
mod serializer;
mod system;

pub use error::RuntimeError;
pub use factory::Factory;
pub use instance::{Instance, Value};
pub use model_file::ModelFile;
pub use registry::ModelManager;
pub use resolver::{ImportResolver, TypeResolver};
pub use serializer::{CLASS_KEY, Serializer};
pub use system::SYSTEM_NAMESPACE;
