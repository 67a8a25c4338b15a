//! Domain types handed to the registry by the model parser.
//!
//! # Module Organization
//!
//! - [`version`] - Semantic versions
//! - [`namespace`] - Namespace keys and fully-qualified names
//! - [`import`] - Import statements
//! - [`declaration`] - Declarations and their fields
//! - [`model`] - The parsed model record
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use bom_core::{NamespaceKey, ParsedModel, QualifiedName};
//! ```

pub mod declaration;
pub mod import;
pub mod model;
pub mod namespace;
pub mod version;

pub use declaration::{Declaration, DeclarationKind, Field, FieldType, PrimitiveType};
pub use import::{Import, ImportTarget};
pub use model::ParsedModel;
pub use namespace::{NamespaceKey, QualifiedName, is_identifier};
pub use version::Version;
