//! Core types for the business-object model registry.
//!
//! This crate holds the value types shared by the workspace:
//!
//! - Namespace keys (`name` or `name@semver`) and fully-qualified type names
//! - Import statements and declarations, as produced by the model parser
//! - [`ParsedModel`], the parser-to-registry hand-off record
//! - [`RegistryConfig`], the versioning policy switch
//! - Error types for name parsing and configuration loading
//!
//! Registration, resolution, instantiation, and serialization live in
//! `bom-runtime`.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::RegistryConfig;
pub use error::{ConfigError, NameError};
pub use types::{
    Declaration, DeclarationKind, Field, FieldType, Import, ImportTarget, NamespaceKey,
    ParsedModel, PrimitiveType, QualifiedName, Version, is_identifier,
};
