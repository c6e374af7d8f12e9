//! tsmeta: type graph to metadata IR.
//!
//! The facade over the workspace crates:
//!
//! - [`tsmeta_oracle`]: the `TypeOracle` capability and the in-memory `TypeTable`
//! - [`tsmeta_ir`]: metadata nodes, constraints and the name-keyed `Registry`
//! - [`tsmeta_walker`]: the bounded, cycle-safe `TypeWalker`
//!
//! [`analyze`] runs one walker over a list of roots and returns everything the
//! run produced.

pub mod config;
pub mod tracing_config;

pub use tsmeta_common::{Diagnostic, DiagnosticCategory, DiagnosticCode, LiteralValue, limits};
pub use tsmeta_ir::{
    AtomicKind, ConstraintKey, Constraints, Degradation, Discriminant, Metadata, MetadataKind,
    ObjectMetadata, Property, Registry, RegistryError,
};
pub use tsmeta_oracle::{
    DocTagSource, NoDocTags, PropertyInfo, TableError, TupleElementInfo, TypeFlags, TypeId,
    TypeOracle, TypeTable,
};
pub use tsmeta_walker::{BudgetProfile, MergePolicy, TypeWalker, WalkLimits, WalkerConfig};

use serde::Serialize;
use tracing::info;

/// A type to analyze, optionally under a declared alias name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    pub name: Option<String>,
    pub ty: TypeId,
}

impl Root {
    pub fn new(ty: TypeId) -> Self {
        Self { name: None, ty }
    }

    /// Walk `ty` as the alias `name` (see [`TypeWalker::walk_named`]).
    pub fn named(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }
}

impl From<TypeId> for Root {
    fn from(ty: TypeId) -> Self {
        Self::new(ty)
    }
}

/// Result of one analysis run.
#[derive(Debug, Serialize)]
pub struct Analysis {
    /// One node per root, in input order.
    pub roots: Vec<Metadata>,
    pub registry: Registry,
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| !d.is_advisory())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Walk every root with one walker session.
pub fn analyze(
    oracle: &dyn TypeOracle,
    tags: &dyn DocTagSource,
    config: WalkerConfig,
    roots: &[Root],
) -> Analysis {
    let mut walker = TypeWalker::new(oracle, tags, config);
    let nodes = roots
        .iter()
        .map(|root| match &root.name {
            Some(name) => walker.walk_named(name, root.ty),
            None => walker.walk(root.ty),
        })
        .collect();
    let (registry, diagnostics) = walker.into_parts();
    info!(
        roots = roots.len(),
        registered = registry.len(),
        diagnostics = diagnostics.len(),
        "analysis finished"
    );
    Analysis {
        roots: nodes,
        registry,
        diagnostics,
    }
}
