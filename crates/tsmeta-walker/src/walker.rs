//! Walker session: run state, entry points and dispatch.
//!
//! One `TypeWalker` is one analysis run. The registry, the visiting set and
//! the name caches persist across top-level calls so a named type reached from
//! many parameters is converted once; the budgets reset per top-level call.
//!
//! The algorithms for specific type shapes live in sibling modules as further
//! `impl TypeWalker` blocks:
//! - `union`: partitioning, collapse, literal fast paths
//! - `intersection`: brand detection and flattening
//! - `object`: named objects, properties, generic instantiation names
//! - `constraints`: phantom objects and documentation tags
//! - `template`: template literal patterns

use crate::budget::{BudgetResult, WalkBudget};
use crate::config::WalkerConfig;
use crate::diagnostics::DiagnosticCollector;
use crate::naming::{self, NameResolution};
use crate::native;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{Level, debug, span, trace, warn};
use tsmeta_common::{Diagnostic, DiagnosticCode};
use tsmeta_ir::{
    AtomicKind, Constraints, Degradation, Metadata, MetadataKind, ObjectMetadata, Registry,
    TupleElement,
};
use tsmeta_oracle::{DocTagSource, TypeFlags, TypeId, TypeOracle};

pub struct TypeWalker<'a> {
    pub(crate) oracle: &'a dyn TypeOracle,
    pub(crate) tags: &'a dyn DocTagSource,
    pub(crate) config: WalkerConfig,
    pub(crate) budget: WalkBudget,
    /// Types whose conversion is in progress (cycle guard).
    pub(crate) visiting: FxHashSet<TypeId>,
    /// Names supplied by `walk_named` for the type currently being named.
    pub(crate) pending_names: FxHashMap<TypeId, String>,
    /// Anonymous types promoted to a name by `walk_named`.
    pub(crate) promoted_names: FxHashMap<TypeId, String>,
    /// Unions and intersections reached again through their own members.
    pub(crate) self_referenced: FxHashSet<TypeId>,
    pub(crate) registry: Registry,
    pub(crate) diagnostics: DiagnosticCollector,
    /// Constraints of branded literals, keyed by sorted phantom member ids.
    pub(crate) branded_literals: FxHashMap<Vec<TypeId>, Option<Box<Constraints>>>,
    /// Composite instantiation names and the argument signature that owns each.
    composite_names: FxHashMap<String, String>,
    /// Named objects whose bodies are being converted.
    pub(crate) open_objects: FxHashSet<String>,
    calls: u32,
    root_label: String,
}

impl<'a> TypeWalker<'a> {
    pub fn new(
        oracle: &'a dyn TypeOracle,
        tags: &'a dyn DocTagSource,
        config: WalkerConfig,
    ) -> Self {
        Self::with_registry(oracle, tags, config, Registry::new())
    }

    /// Continue filling a registry produced by an earlier walker.
    pub fn with_registry(
        oracle: &'a dyn TypeOracle,
        tags: &'a dyn DocTagSource,
        config: WalkerConfig,
        registry: Registry,
    ) -> Self {
        let budget = WalkBudget::new(config.limits.max_depth(), config.limits.max_breadth());
        Self {
            oracle,
            tags,
            config,
            budget,
            visiting: FxHashSet::default(),
            pending_names: FxHashMap::default(),
            promoted_names: FxHashMap::default(),
            self_referenced: FxHashSet::default(),
            registry,
            diagnostics: DiagnosticCollector::new(),
            branded_literals: FxHashMap::default(),
            composite_names: FxHashMap::default(),
            open_objects: FxHashSet::default(),
            calls: 0,
            root_label: String::new(),
        }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.items()
    }

    pub fn into_parts(self) -> (Registry, Vec<Diagnostic>) {
        (self.registry, self.diagnostics.into_vec())
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Convert `ty` into a metadata node.
    ///
    /// Called with no walk in progress, this starts a top-level call with a
    /// fresh breadth budget. Every nested conversion also goes through here.
    pub fn walk(&mut self, ty: TypeId) -> Metadata {
        if !self.budget.is_active() {
            self.begin_call(ty);
        }
        let outcome = self.budget.enter();
        let node = if outcome.is_entered() {
            self.dispatch(ty)
        } else {
            self.exhausted(ty, outcome)
        };
        self.budget.leave();
        node
    }

    /// Convert `ty` and register the result under `name`.
    ///
    /// Used for type aliases: self-references reached through the alias's
    /// union or intersection resolve to `Ref(name)`, and an anonymous object
    /// behind the alias is registered under `name` instead of inlined.
    /// Phantom results are returned inline and never registered.
    pub fn walk_named(&mut self, name: &str, ty: TypeId) -> Metadata {
        let _span = span!(Level::DEBUG, "walk_named", name, type_id = ty.0).entered();

        if self.registry.has(name) {
            return Metadata::reference(name);
        }
        self.pending_names.insert(ty, name.to_string());
        self.promoted_names.insert(ty, name.to_string());
        let node = self.walk(ty);
        self.pending_names.remove(&ty);

        if self.registry.has(name) {
            return Metadata::reference(name);
        }
        if self.is_phantom_node(&node) {
            return node;
        }
        self.register(name, node);
        Metadata::reference(name)
    }

    fn begin_call(&mut self, ty: TypeId) {
        self.calls += 1;
        self.root_label = self.display_name(ty);
        debug!(call = self.calls, root = %self.root_label, "top-level walk");
    }

    fn exhausted(&mut self, ty: TypeId, outcome: BudgetResult) -> Metadata {
        let (reason, code, limit) = match outcome {
            BudgetResult::DepthExceeded => (
                Degradation::DepthExceeded,
                DiagnosticCode::DepthExceeded,
                self.budget.max_depth(),
            ),
            _ => (
                Degradation::BreadthExceeded,
                DiagnosticCode::BreadthExceeded,
                self.budget.max_breadth(),
            ),
        };
        if self.budget.first_report(outcome) {
            warn!(
                type_id = ty.0,
                root = %self.root_label,
                walked = self.budget.walked(),
                ?reason,
                "walk budget exhausted; summarizing as any"
            );
            let key = format!("call-{}", self.calls);
            let limit = limit.to_string();
            self.diagnostics
                .report_once(&key, code, &[limit.as_str(), self.root_label.as_str()]);
        }
        Metadata::degraded(reason)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    pub(crate) fn dispatch(&mut self, ty: TypeId) -> Metadata {
        let flags = self.oracle.flags(ty);
        trace!(type_id = ty.0, ?flags, depth = self.budget.depth(), "dispatch");

        if flags.contains(TypeFlags::UNION) {
            return self.walk_union(ty);
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            return self.walk_intersection(ty);
        }
        if let Some(node) = self.primitive(ty, flags) {
            return node;
        }
        if flags.contains(TypeFlags::TEMPLATE_LITERAL) {
            return self.template_literal(ty);
        }
        if flags.intersects(TypeFlags::DEFERRED) {
            return match self.oracle.base_constraint(ty) {
                Some(constraint) if constraint != ty => self.walk(constraint),
                _ => Metadata::any(),
            };
        }
        if flags.contains(TypeFlags::OBJECT) {
            return self.walk_object_like(ty);
        }
        if flags.contains(TypeFlags::NON_PRIMITIVE) {
            return Metadata::object(ObjectMetadata::default());
        }
        Metadata::any()
    }

    fn primitive(&self, ty: TypeId, flags: TypeFlags) -> Option<Metadata> {
        let kind = if flags.contains(TypeFlags::ANY) {
            MetadataKind::Any
        } else if flags.contains(TypeFlags::UNKNOWN) {
            MetadataKind::Unknown
        } else if flags.contains(TypeFlags::NEVER) {
            MetadataKind::Never
        } else if flags.contains(TypeFlags::VOID) {
            MetadataKind::Void
        } else if flags.contains(TypeFlags::NULL) {
            MetadataKind::Atomic(AtomicKind::Null)
        } else if flags.contains(TypeFlags::UNDEFINED) {
            MetadataKind::Atomic(AtomicKind::Undefined)
        } else if let Some(value) = flags
            .intersects(TypeFlags::LITERAL)
            .then(|| self.oracle.literal_value(ty))
            .flatten()
        {
            MetadataKind::Literal(value)
        } else if flags.intersects(TypeFlags::STRING | TypeFlags::STRING_LITERAL) {
            MetadataKind::Atomic(AtomicKind::String)
        } else if flags.intersects(TypeFlags::NUMBER | TypeFlags::NUMBER_LITERAL) {
            MetadataKind::Atomic(AtomicKind::Number)
        } else if flags.intersects(TypeFlags::BOOLEAN | TypeFlags::BOOLEAN_LITERAL) {
            MetadataKind::Atomic(AtomicKind::Boolean)
        } else if flags.intersects(TypeFlags::BIGINT | TypeFlags::BIGINT_LITERAL) {
            MetadataKind::Atomic(AtomicKind::Bigint)
        } else if flags.intersects(TypeFlags::ES_SYMBOL | TypeFlags::UNIQUE_SYMBOL) {
            MetadataKind::Atomic(AtomicKind::Symbol)
        } else {
            return None;
        };
        Some(Metadata::new(kind))
    }

    fn walk_object_like(&mut self, ty: TypeId) -> Metadata {
        if self.oracle.is_tuple_type(ty) {
            return self.walk_tuple(ty);
        }
        if self.oracle.is_array_type(ty) {
            return self.walk_array(ty);
        }

        if let Some(symbol) = self.oracle.symbol_name(ty) {
            if native::is_wrapper(&symbol) {
                trace!(wrapper = %symbol, "unwrapping");
                return match self.oracle.type_arguments(ty).first() {
                    Some(&inner) => self.dispatch(inner),
                    None => Metadata::any(),
                };
            }
            if native::is_value_type(&symbol)
                || self.config.extra_native_types.iter().any(|n| *n == symbol)
            {
                return Metadata::native(symbol, Vec::new());
            }
            if native::is_container(&symbol) {
                let arguments = self
                    .oracle
                    .type_arguments(ty)
                    .into_iter()
                    .map(|arg| self.walk(arg))
                    .collect();
                return Metadata::native(symbol, arguments);
            }
        }

        if self.oracle.array_element_type(ty).is_some() {
            return self.walk_array(ty);
        }
        if self.oracle.call_signature_count(ty) > 0
            && self.oracle.properties(ty).iter().all(|p| p.is_method)
        {
            return Metadata::native(native::FUNCTION, Vec::new());
        }
        self.walk_object(ty)
    }

    fn walk_array(&mut self, ty: TypeId) -> Metadata {
        let element = match self.oracle.array_element_type(ty) {
            Some(element) => self.walk(element),
            None => Metadata::any(),
        };
        Metadata::array(element)
    }

    fn walk_tuple(&mut self, ty: TypeId) -> Metadata {
        let elements = self
            .oracle
            .tuple_elements(ty)
            .into_iter()
            .map(|element| TupleElement {
                ty: self.walk(element.type_id),
                optional: element.optional,
                rest: element.rest,
            })
            .collect();
        Metadata::new(MetadataKind::Tuple(elements))
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    /// Register `node` under `name`.
    ///
    /// Callers check the registry first, so a collision is a walker bug: it
    /// asserts in debug builds and is reported as a warning otherwise.
    pub(crate) fn register(&mut self, name: &str, node: Metadata) {
        debug_assert!(
            !self.registry.has(name),
            "duplicate registration of '{name}'"
        );
        match self.registry.try_register(name, node) {
            Ok(()) => debug!(name, "registered"),
            Err(err) => {
                warn!(%err, "registration dropped");
                self.diagnostics.report_once(
                    &format!("register:{name}"),
                    DiagnosticCode::DuplicateRegistration,
                    &[name],
                );
            }
        }
    }

    pub(crate) fn is_phantom_node(&self, node: &Metadata) -> bool {
        node.is_phantom(&|name| self.config.is_marker(name))
    }

    /// Name for a generic instantiation.
    ///
    /// A composite name belongs to the first argument signature that produced
    /// it; another instantiation rendering to the same name is unnameable.
    /// No diagnostic is emitted here, see [`Self::report_unnameable`].
    pub(crate) fn instantiation_name(&mut self, base: &str, args: &[TypeId]) -> NameResolution {
        if args.is_empty() {
            return NameResolution::Named(base.to_string());
        }
        let Some(composite) = naming::composite_name(self.oracle, base, args) else {
            return NameResolution::Unnameable(base.to_string());
        };
        let owner = self
            .composite_names
            .entry(composite.name.clone())
            .or_insert_with(|| composite.signature.clone());
        if *owner != composite.signature {
            debug!(
                name = %composite.name,
                owner = %owner,
                signature = %composite.signature,
                "composite name taken by another instantiation"
            );
            return NameResolution::Unnameable(base.to_string());
        }
        NameResolution::Named(composite.name)
    }

    /// Advisory for an instantiation that is inlined instead of registered.
    pub(crate) fn report_unnameable(&mut self, base: &str) {
        if self
            .diagnostics
            .report_once(base, DiagnosticCode::UnnameableTypeArguments, &[base])
        {
            debug!(base, "type arguments cannot be named; inlining");
        }
    }

    fn display_name(&self, ty: TypeId) -> String {
        naming::declared_name(self.oracle, ty).unwrap_or_else(|| format!("#{}", ty.0))
    }
}

#[cfg(test)]
#[path = "../tests/walker_tests.rs"]
mod tests;
