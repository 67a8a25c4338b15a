//! The namespace registry.
//!
//! [`ModelManager`] owns every registered [`ModelFile`], keyed by canonical
//! namespace string, and enforces the versioning policy of its
//! [`RegistryConfig`] at registration time. Import and type references are
//! resolved lazily, so models may be registered in any order.
//!
//! # Usage
//!
//! ```
//! use bom_core::{Declaration, Field, ParsedModel, PrimitiveType, RegistryConfig};
//! use bom_runtime::ModelManager;
//!
//! let mut manager = ModelManager::new(RegistryConfig::default());
//! manager.add_model(
//!     ParsedModel::new("person@1.0.0".parse()?).with_declaration(
//!         Declaration::concept("Person")
//!             .identified_by("email")
//!             .with_field(Field::primitive("email", PrimitiveType::String)),
//!     ),
//! )?;
//!
//! assert!(manager.get_model_file("person@1.0.0").is_some());
//! assert!(manager.get_model_file("person").is_none());
//! assert_eq!(manager.get_type("person@1.0.0.Person")?.name, "Person");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Concurrency
//!
//! Registration takes `&mut self`; lookups, resolution, and serialization take
//! `&self`. The registry does no locking of its own beyond the per-file import
//! cache, so a registry shared across threads must be wrapped by the caller
//! (usually each unit of work owns its own registry).

use bom_core::{Declaration, NamespaceKey, ParsedModel, RegistryConfig};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::error::RuntimeError;
use crate::factory::Factory;
use crate::model_file::ModelFile;
use crate::resolver::{ImportResolver, TypeResolver};
use crate::serializer::Serializer;
use crate::system;

/// Registry of model files, keyed by canonical namespace.
///
/// Enumeration order is registration order, so every listing is
/// deterministic.
#[derive(Debug)]
pub struct ModelManager {
    config: RegistryConfig,

    /// Registered files in registration order.
    files: Vec<ModelFile>,

    /// Canonical namespace string to index in `files`.
    index: FxHashMap<String, usize>,
}

impl Default for ModelManager {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl ModelManager {
    /// Creates a registry with the given policy.
    ///
    /// The system model is installed when `config.system_model` is set.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let mut manager = Self {
            config,
            files: Vec::new(),
            index: FxHashMap::default(),
        };
        manager.install_system_model();
        manager
    }

    /// Creates a registry that requires versioned namespaces and imports.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(RegistryConfig::strict())
    }

    /// The configuration fixed at construction.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns `true` if the strict versioning policy is in force.
    #[inline]
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.config.versioned_namespaces_strict
    }

    fn install_system_model(&mut self) {
        if !self.config.system_model {
            return;
        }
        match system::system_model() {
            Ok(model) => {
                self.insert(ModelFile::new(model, true));
            }
            Err(error) => warn!(error = %error, "Failed to build system model"),
        }
    }

    fn insert(&mut self, file: ModelFile) -> usize {
        let position = self.files.len();
        self.index.insert(file.namespace().canonical(), position);
        self.files.push(file);
        position
    }

    /// Registers a parsed model.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::UnversionedNamespace`] if the registry is strict and
    ///   the namespace has no version
    /// - [`RuntimeError::DuplicateNamespace`] if the canonical key exists
    /// - [`RuntimeError::UnversionedImport`] if the registry is strict and an
    ///   import has no version
    /// - [`RuntimeError::InvalidModel`] for duplicate declaration or field
    ///   names, and malformed declaration names
    ///
    /// On error the registry is unchanged.
    pub fn add_model(&mut self, parsed: ParsedModel) -> Result<&ModelFile, RuntimeError> {
        self.check_admissible(&parsed, &FxHashSet::default())?;

        let position = self.insert(ModelFile::new(parsed, false));
        let file = &self.files[position];
        info!(
            namespace = %file.namespace(),
            declarations = file.declarations().len(),
            imports = file.imports().len(),
            "Registered model"
        );
        Ok(file)
    }

    /// Registers several models atomically.
    ///
    /// Every model is checked against the registry and the rest of the batch
    /// before any of them is committed. Returns the number registered.
    ///
    /// # Errors
    ///
    /// As [`ModelManager::add_model`]; nothing is registered on error.
    pub fn add_models<I>(&mut self, models: I) -> Result<usize, RuntimeError>
    where
        I: IntoIterator<Item = ParsedModel>,
    {
        let models: Vec<ParsedModel> = models.into_iter().collect();
        let mut pending = FxHashSet::default();
        for model in &models {
            self.check_admissible(model, &pending)?;
            pending.insert(model.namespace.canonical());
        }

        let count = models.len();
        for model in models {
            self.insert(ModelFile::new(model, false));
        }
        info!(count, "Registered model batch");
        Ok(count)
    }

    /// Applies the registration-time policy and structural checks.
    fn check_admissible(
        &self,
        parsed: &ParsedModel,
        pending: &FxHashSet<String>,
    ) -> Result<(), RuntimeError> {
        let namespace = parsed.namespace.canonical();

        if self.is_strict() && !parsed.namespace.is_versioned() {
            warn!(namespace = %namespace, "Rejected unversioned namespace");
            return Err(RuntimeError::UnversionedNamespace { namespace });
        }

        if self.index.contains_key(&namespace) || pending.contains(&namespace) {
            warn!(namespace = %namespace, "Rejected duplicate namespace");
            return Err(RuntimeError::DuplicateNamespace { namespace });
        }

        if self.is_strict() {
            if let Some(import) = parsed.imports.iter().find(|i| !i.is_versioned()) {
                warn!(namespace = %namespace, import = %import, "Rejected unversioned import");
                return Err(RuntimeError::UnversionedImport {
                    namespace,
                    import: import.to_string(),
                });
            }
        }

        check_structure(&namespace, &parsed.declarations)
    }

    /// Looks up a model file by exact canonical key (`name` or `name@version`).
    ///
    /// No fuzzy matching: `person` never finds `person@1.0.0`.
    #[must_use]
    pub fn get_model_file(&self, key: &str) -> Option<&ModelFile> {
        self.index.get(key).and_then(|&position| self.files.get(position))
    }

    /// Looks up a model file by namespace key.
    #[must_use]
    pub fn get_model_file_by_key(&self, key: &NamespaceKey) -> Option<&ModelFile> {
        self.get_model_file(&key.canonical())
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains_namespace(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Resolves a fully-qualified type name to its declaration.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::NamespaceNotDefined`] if the namespace part does not
    ///   resolve
    /// - [`RuntimeError::TypeNotFound`] if the namespace does not declare the
    ///   type
    /// - [`RuntimeError::InvalidModel`] if the supertype chain is cyclic
    pub fn get_type(&self, fqn: &str) -> Result<&Declaration, RuntimeError> {
        self.type_resolver().resolve(fqn)
    }

    /// Registered namespaces in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceKey> {
        self.files.iter().map(ModelFile::namespace)
    }

    /// Registered model files in registration order.
    pub fn model_files(&self) -> impl Iterator<Item = &ModelFile> {
        self.files.iter()
    }

    /// Every registered declaration, file by file in registration order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.files.iter().flat_map(ModelFile::declarations)
    }

    /// Number of registered model files, including the system model.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Removes every user model. The system model, if enabled, is reinstalled.
    pub fn clear(&mut self) {
        let removed = self.files.iter().filter(|f| !f.is_system_model()).count();
        self.files.clear();
        self.index.clear();
        self.install_system_model();
        info!(removed, "Cleared model registry");
    }

    /// Resolves every import and supertype chain of every registered model,
    /// and checks that each identifying field is one of its type's fields.
    ///
    /// Registration defers resolution so models can arrive out of dependency
    /// order; call this once all of them are in to surface dangling
    /// references eagerly.
    ///
    /// # Errors
    ///
    /// The first resolution error found, in registration order.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let imports = self.import_resolver();
        let types = self.type_resolver();
        for file in &self.files {
            imports.resolve_all(file)?;
            for declaration in file.declarations() {
                types.fields(declaration)?;
                types.identifying_field(declaration)?;
            }
        }
        debug!(files = self.files.len(), "Validated model registry");
        Ok(())
    }

    /// An import resolver bound to this registry.
    #[inline]
    #[must_use]
    pub const fn import_resolver(&self) -> ImportResolver<'_> {
        ImportResolver::new(self)
    }

    /// A type resolver bound to this registry.
    #[inline]
    #[must_use]
    pub const fn type_resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(self)
    }

    /// A factory bound to this registry.
    #[inline]
    #[must_use]
    pub const fn factory(&self) -> Factory<'_> {
        Factory::new(self)
    }

    /// A serializer bound to this registry.
    #[inline]
    #[must_use]
    pub const fn serializer(&self) -> Serializer<'_> {
        Serializer::new(self)
    }
}

/// Rejects duplicate declaration names, duplicate field names, and names
/// that are not identifiers.
fn check_structure(namespace: &str, declarations: &[Declaration]) -> Result<(), RuntimeError> {
    let mut seen = FxHashSet::default();
    for declaration in declarations {
        if !bom_core::is_identifier(&declaration.name) {
            return Err(RuntimeError::invalid_model(format!(
                "declaration name '{}' in namespace '{namespace}' is not an identifier",
                declaration.name
            )));
        }
        if !seen.insert(declaration.name.as_str()) {
            return Err(RuntimeError::invalid_model(format!(
                "namespace '{namespace}' declares '{}' more than once",
                declaration.name
            )));
        }

        let mut fields = FxHashSet::default();
        for field in &declaration.fields {
            if !fields.insert(field.name.as_str()) {
                return Err(RuntimeError::invalid_model(format!(
                    "type '{namespace}.{}' declares field '{}' more than once",
                    declaration.name, field.name
                )));
            }
        }

        if declaration.identified_by.as_deref().is_some_and(str::is_empty) {
            return Err(RuntimeError::invalid_model(format!(
                "type '{namespace}.{}' has an empty identifying field",
                declaration.name
            )));
        }
    }
    Ok(())
}
