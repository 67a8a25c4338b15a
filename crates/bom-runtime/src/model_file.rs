//! Registered model files.

use bom_core::{Declaration, DeclarationKind, Import, NamespaceKey, ParsedModel};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A model registered in a [`ModelManager`](crate::ModelManager).
///
/// Immutable once registered, apart from the import cache: the first
/// successful resolution of each import is remembered for the lifetime of the
/// file. Failed resolutions are never cached, so registering a missing target
/// later lets a retry succeed.
///
/// # Thread Safety
///
/// The cache sits behind a [`RwLock`], so read-only registry operations may
/// resolve imports from several threads at once.
#[derive(Debug)]
pub struct ModelFile {
    namespace: NamespaceKey,
    imports: Vec<Import>,
    declarations: Vec<Declaration>,
    origin: Option<String>,
    is_system: bool,

    /// Resolved namespace per import index.
    resolved_imports: RwLock<FxHashMap<usize, NamespaceKey>>,
}

impl ModelFile {
    /// Takes ownership of a parsed model, binding every declaration to its
    /// namespace.
    pub(crate) fn new(parsed: ParsedModel, is_system: bool) -> Self {
        let ParsedModel {
            namespace,
            imports,
            mut declarations,
            origin,
        } = parsed;
        for declaration in &mut declarations {
            declaration.namespace = Some(namespace.clone());
        }
        Self {
            namespace,
            imports,
            declarations,
            origin,
            is_system,
            resolved_imports: RwLock::new(FxHashMap::default()),
        }
    }

    /// The namespace key this file is registered under.
    #[inline]
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceKey {
        &self.namespace
    }

    /// Import statements in source order.
    #[inline]
    #[must_use]
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Declarations in source order.
    #[inline]
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Looks up a declaration by short name.
    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Returns `true` if this file declares `name`.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.declaration(name).is_some()
    }

    /// Declarations of one kind, in source order.
    pub fn declarations_of(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }

    /// Where the model came from, as given by the parser.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Returns `true` for the built-in system model.
    #[inline]
    #[must_use]
    pub const fn is_system_model(&self) -> bool {
        self.is_system
    }

    /// Number of imports resolved so far.
    #[must_use]
    pub fn resolved_import_count(&self) -> usize {
        self.resolved_imports.read().len()
    }

    pub(crate) fn cached_import(&self, index: usize) -> Option<NamespaceKey> {
        self.resolved_imports.read().get(&index).cloned()
    }

    pub(crate) fn cache_import(&self, index: usize, key: NamespaceKey) {
        self.resolved_imports.write().insert(index, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelFile {
        let parsed = ParsedModel::new("hr@1.0.0".parse().unwrap())
            .with_origin("hr.cto")
            .with_import("org.acme@1.0.0.*".parse().unwrap())
            .with_declaration(Declaration::concept("Address"))
            .with_declaration(Declaration::new(DeclarationKind::Participant, "Employee"));
        ModelFile::new(parsed, false)
    }

    #[test]
    fn test_declarations_are_bound_to_namespace() {
        let file = sample();
        for declaration in file.declarations() {
            assert_eq!(declaration.namespace.as_ref(), Some(file.namespace()));
        }
        assert_eq!(
            file.declaration("Employee")
                .and_then(Declaration::qualified_name)
                .map(|q| q.to_string())
                .as_deref(),
            Some("hr@1.0.0.Employee")
        );
    }

    #[test]
    fn test_lookup_and_filters() {
        let file = sample();
        assert!(file.is_declared("Address"));
        assert!(!file.is_declared("Manager"));
        let participants: Vec<_> = file
            .declarations_of(DeclarationKind::Participant)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(participants, ["Employee"]);
        assert_eq!(file.origin(), Some("hr.cto"));
        assert!(!file.is_system_model());
    }

    #[test]
    fn test_import_cache() {
        let file = sample();
        assert_eq!(file.resolved_import_count(), 0);
        assert!(file.cached_import(0).is_none());

        let key: NamespaceKey = "org.acme@1.0.0".parse().unwrap();
        file.cache_import(0, key.clone());
        assert_eq!(file.cached_import(0), Some(key));
        assert_eq!(file.resolved_import_count(), 1);
    }
}
