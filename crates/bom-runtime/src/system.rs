//! The built-in system model.
//!
//! Registries constructed with [`RegistryConfig::system_model`] start with the
//! `concerto@1.0.0` namespace, which declares the abstract base type of every
//! declaration kind. It is versioned, so strict registries accept imports of
//! it such as `import {Event} from concerto@1.0.0`.
//!
//! [`RegistryConfig::system_model`]: bom_core::RegistryConfig::system_model

use bom_core::{Declaration, DeclarationKind, NameError, ParsedModel};

/// Canonical key of the system namespace.
pub const SYSTEM_NAMESPACE: &str = "concerto@1.0.0";

/// Builds the system model.
pub(crate) fn system_model() -> Result<ParsedModel, NameError> {
    let base = |kind: DeclarationKind, name: &str| Declaration::new(kind, name).into_abstract();

    Ok(ParsedModel::new(SYSTEM_NAMESPACE.parse()?)
        .with_origin("system")
        .with_declaration(base(DeclarationKind::Concept, "Concept"))
        .with_declaration(base(DeclarationKind::Asset, "Asset"))
        .with_declaration(base(DeclarationKind::Participant, "Participant"))
        .with_declaration(base(DeclarationKind::Transaction, "Transaction"))
        .with_declaration(base(DeclarationKind::Event, "Event")))
}
