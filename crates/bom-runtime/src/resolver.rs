//! Import and type resolution against a [`ModelManager`].
//!
//! Both resolvers are cheap borrowed views of the registry, obtained from
//! [`ModelManager::import_resolver`] and [`ModelManager::type_resolver`].
//! Resolution is lazy: nothing here runs at registration time, so models may
//! reference namespaces that are registered later.

use bom_core::{Declaration, Field, NamespaceKey, QualifiedName};
use rustc_hash::FxHashSet;
use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::error::RuntimeError;
use crate::model_file::ModelFile;
use crate::registry::ModelManager;

/// Resolves the imports of a model file to registered model files.
///
/// Successful resolutions are cached in the importing [`ModelFile`];
/// failures are not, so a retry after the target is registered succeeds.
#[derive(Debug, Clone, Copy)]
pub struct ImportResolver<'a> {
    manager: &'a ModelManager,
}

impl<'a> ImportResolver<'a> {
    pub(crate) const fn new(manager: &'a ModelManager) -> Self {
        Self { manager }
    }

    /// Resolves import `index` of `file`.
    ///
    /// Strict registries never hold unversioned imports (registration
    /// rejects them), so every import here is looked up by its exact key.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::NamespaceNotDefined`] if no model is registered under
    ///   the import's exact key
    /// - [`RuntimeError::TypeNotFound`] if a named type is not declared by the
    ///   target
    /// - [`RuntimeError::InvalidModel`] if `file` has no import `index`
    pub fn resolve(&self, file: &ModelFile, index: usize) -> Result<&'a ModelFile, RuntimeError> {
        let Some(import) = file.imports().get(index) else {
            return Err(RuntimeError::invalid_model(format!(
                "namespace '{}' has no import #{index}",
                file.namespace()
            )));
        };

        if let Some(target) = file
            .cached_import(index)
            .and_then(|key| self.manager.get_model_file_by_key(&key))
        {
            debug!(namespace = %file.namespace(), import = %import, "Import cache hit");
            return Ok(target);
        }

        let key = import.namespace();
        let target = self.manager.get_model_file_by_key(key).ok_or_else(|| {
            RuntimeError::namespace_not_defined(key.canonical(), import.to_string())
        })?;

        if let Some(missing) = import.type_names().iter().find(|n| !target.is_declared(n)) {
            return Err(RuntimeError::type_not_found(key.canonical(), missing.as_str()));
        }

        file.cache_import(index, target.namespace().clone());
        debug!(
            namespace = %file.namespace(),
            import = %import,
            target = %target.namespace(),
            "Resolved import"
        );
        Ok(target)
    }

    /// Resolves every import of `file`, in source order.
    ///
    /// # Errors
    ///
    /// The first failure, as for [`ImportResolver::resolve`].
    pub fn resolve_all(&self, file: &ModelFile) -> Result<Vec<&'a ModelFile>, RuntimeError> {
        (0..file.imports().len())
            .map(|index| self.resolve(file, index))
            .collect()
    }
}

/// Resolves fully-qualified names, short-name references, and supertype
/// chains.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    manager: &'a ModelManager,
}

impl<'a> TypeResolver<'a> {
    pub(crate) const fn new(manager: &'a ModelManager) -> Self {
        Self { manager }
    }

    /// Resolves a namespace reference to its model file.
    ///
    /// Lookup is by exact canonical key in both modes. In strict mode an
    /// unversioned reference fails outright, even when a versioned namespace
    /// of the same name is registered.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::NamespaceNotDefined`], naming `reference`.
    pub fn resolve_namespace(
        &self,
        namespace: &NamespaceKey,
        reference: &str,
    ) -> Result<&'a ModelFile, RuntimeError> {
        if self.manager.is_strict() && !namespace.is_versioned() {
            return Err(RuntimeError::namespace_not_defined(namespace.canonical(), reference));
        }
        self.manager
            .get_model_file_by_key(namespace)
            .ok_or_else(|| RuntimeError::namespace_not_defined(namespace.canonical(), reference))
    }

    /// Resolves a fully-qualified name and checks its supertype chain.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::NamespaceNotDefined`] if the namespace part does not
    ///   resolve
    /// - [`RuntimeError::TypeNotFound`] if the namespace does not declare the
    ///   type
    /// - [`RuntimeError::InvalidModel`] if the supertype chain is cyclic
    pub fn resolve(&self, fqn: &str) -> Result<&'a Declaration, RuntimeError> {
        let declaration = self.lookup(fqn)?;
        self.supertype_chain(declaration)?;
        Ok(declaration)
    }

    /// As [`TypeResolver::resolve`], for an already parsed name.
    ///
    /// # Errors
    ///
    /// See [`TypeResolver::resolve`].
    pub fn resolve_qualified(&self, name: &QualifiedName) -> Result<&'a Declaration, RuntimeError> {
        let declaration = self.lookup_qualified(name)?;
        self.supertype_chain(declaration)?;
        Ok(declaration)
    }

    /// Namespace and declaration lookup, without walking supertypes.
    ///
    /// The namespace is resolved before the type name is looked at, so a
    /// reference into an unknown namespace is always `NamespaceNotDefined`.
    fn lookup(&self, fqn: &str) -> Result<&'a Declaration, RuntimeError> {
        let (namespace, name) = fqn.rsplit_once('.').unwrap_or(("", fqn));
        let key: NamespaceKey = namespace
            .parse()
            .map_err(|_| RuntimeError::namespace_not_defined(namespace, fqn))?;
        let file = self.resolve_namespace(&key, fqn)?;
        declared_in(file, name)
    }

    fn lookup_qualified(&self, name: &QualifiedName) -> Result<&'a Declaration, RuntimeError> {
        let file = self.resolve_namespace(name.namespace(), &name.to_string())?;
        declared_in(file, name.name())
    }

    /// Resolves a type reference written inside `file`.
    ///
    /// A reference containing `.` is a fully-qualified name. Otherwise the
    /// first match wins among: declarations of `file`, types named by its
    /// explicit imports, then the targets of its wildcard imports in source
    /// order.
    ///
    /// # Errors
    ///
    /// Import resolution failures, or [`RuntimeError::TypeNotFound`] if
    /// nothing in scope declares `name`.
    pub fn resolve_reference(
        &self,
        file: &'a ModelFile,
        name: &str,
    ) -> Result<&'a Declaration, RuntimeError> {
        if name.contains('.') {
            return self.lookup(name);
        }
        if let Some(local) = file.declaration(name) {
            return Ok(local);
        }

        let imports = self.manager.import_resolver();
        for (index, import) in file.imports().iter().enumerate() {
            if import.names_type(name) {
                let target = imports.resolve(file, index)?;
                return target
                    .declaration(name)
                    .ok_or_else(|| RuntimeError::type_not_found(target.namespace().canonical(), name));
            }
        }
        for (index, import) in file.imports().iter().enumerate() {
            if import.is_wildcard() {
                if let Some(found) = imports.resolve(file, index)?.declaration(name) {
                    return Ok(found);
                }
            }
        }

        Err(RuntimeError::type_not_found(file.namespace().canonical(), name))
    }

    /// The model file a registered declaration belongs to.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidModel`] for a declaration that was never
    /// registered.
    pub fn owning_file(&self, declaration: &Declaration) -> Result<&'a ModelFile, RuntimeError> {
        declaration
            .namespace
            .as_ref()
            .and_then(|key| self.manager.get_model_file_by_key(key))
            .ok_or_else(|| {
                RuntimeError::invalid_model(format!(
                    "declaration '{}' is not registered",
                    declaration.name
                ))
            })
    }

    /// The direct supertype of `declaration`, if it declares one.
    ///
    /// # Errors
    ///
    /// See [`TypeResolver::resolve_reference`].
    pub fn supertype(&self, declaration: &Declaration) -> Result<Option<&'a Declaration>, RuntimeError> {
        let Some(reference) = declaration.super_type.as_deref() else {
            return Ok(None);
        };
        let file = self.owning_file(declaration)?;
        self.resolve_reference(file, reference).map(Some)
    }

    /// `declaration` followed by its supertypes, nearest first.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidModel`] on a cycle; otherwise see
    /// [`TypeResolver::supertype`].
    pub fn supertype_chain(
        &self,
        declaration: &'a Declaration,
    ) -> Result<SmallVec<[&'a Declaration; 4]>, RuntimeError> {
        let mut visited = FxHashSet::default();
        visited.insert(display_name(declaration));

        let mut chain: SmallVec<[&'a Declaration; 4]> = smallvec![declaration];
        let mut current = declaration;
        while let Some(parent) = self.supertype(current)? {
            let fqn = display_name(parent);
            if !visited.insert(fqn.clone()) {
                return Err(RuntimeError::invalid_model(format!(
                    "supertype cycle through '{fqn}' (starting at '{}')",
                    display_name(declaration)
                )));
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// All fields of `declaration`, inherited first: root supertype down to
    /// the type itself, each in declaration order.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidModel`] if a type redeclares an inherited
    /// field; otherwise see [`TypeResolver::supertype_chain`].
    pub fn fields(&self, declaration: &'a Declaration) -> Result<Vec<&'a Field>, RuntimeError> {
        let chain = self.supertype_chain(declaration)?;
        let mut seen = FxHashSet::default();
        let mut fields = Vec::new();
        for &owner in chain.iter().rev() {
            for field in &owner.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(RuntimeError::invalid_model(format!(
                        "type '{}' redeclares inherited field '{}'",
                        display_name(owner),
                        field.name
                    )));
                }
                fields.push(field);
            }
        }
        Ok(fields)
    }

    /// As [`TypeResolver::fields`], by fully-qualified name.
    ///
    /// # Errors
    ///
    /// See [`TypeResolver::resolve`] and [`TypeResolver::fields`].
    pub fn fields_of(&self, fqn: &str) -> Result<Vec<&'a Field>, RuntimeError> {
        self.fields(self.lookup(fqn)?)
    }

    /// The identifying field, declared on the type or inherited.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidModel`] if the identifying field is not among
    /// the fields of the type; otherwise see [`TypeResolver::fields`].
    pub fn identifying_field(
        &self,
        declaration: &'a Declaration,
    ) -> Result<Option<&'a str>, RuntimeError> {
        let Some(id) = self
            .supertype_chain(declaration)?
            .into_iter()
            .find_map(|d| d.identified_by.as_deref())
        else {
            return Ok(None);
        };
        if !self.fields(declaration)?.iter().any(|f| f.name == id) {
            return Err(RuntimeError::invalid_model(format!(
                "type '{}' is identified by undeclared field '{id}'",
                display_name(declaration)
            )));
        }
        Ok(Some(id))
    }

    /// Returns `true` if `sub` is `sup` or extends it, directly or not.
    ///
    /// # Errors
    ///
    /// Resolution failures of either name.
    pub fn is_assignable(&self, sub: &str, sup: &str) -> Result<bool, RuntimeError> {
        let target = display_name(self.resolve(sup)?);
        Ok(self
            .supertype_chain(self.lookup(sub)?)?
            .into_iter()
            .any(|d| display_name(d) == target))
    }
}

/// Looks up `name` in an already resolved namespace.
///
/// Registered declaration names are identifiers, so a malformed `name` is
/// simply not found.
fn declared_in<'a>(file: &'a ModelFile, name: &str) -> Result<&'a Declaration, RuntimeError> {
    let declaration = file
        .declaration(name)
        .ok_or_else(|| RuntimeError::type_not_found(file.namespace().canonical(), name))?;
    debug!(namespace = %file.namespace(), type_name = name, "Resolved type");
    Ok(declaration)
}

/// The FQN of a registered declaration, or its short name if unbound.
fn display_name(declaration: &Declaration) -> String {
    declaration
        .qualified_name()
        .map_or_else(|| declaration.name.clone(), |q| q.to_string())
}
