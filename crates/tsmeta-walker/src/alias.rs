//! Registration of named unions and intersections.
//!
//! Objects register under their own symbol. Unions and intersections only
//! have the alias they were declared through, and they are registered in two
//! situations:
//! - met as a sub-field (depth > 1) with a resolvable alias name
//! - reached again through their own members, which already returned a
//!   `Ref` that must resolve

use crate::naming::{NameResolution, is_placeholder};
use crate::walker::TypeWalker;
use tracing::debug;
use tsmeta_ir::{Metadata, MetadataKind};
use tsmeta_oracle::{TypeFlags, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AliasShape {
    Union,
    Intersection,
}

impl<'a> TypeWalker<'a> {
    /// Name under which a union or intersection met below the top level
    /// would be registered. Resolving it reports nothing; an unnameable
    /// alias is only reported by [`Self::finish_alias`] once the result
    /// would actually have been registered.
    pub(crate) fn subfield_alias_name(&mut self, ty: TypeId) -> NameResolution {
        if self.budget.depth() <= 1 || !self.config.register_subfield_aliases {
            return NameResolution::Anonymous;
        }
        self.alias_name(ty)
    }

    fn alias_name(&mut self, ty: TypeId) -> NameResolution {
        if let Some(name) = self.pending_names.get(&ty) {
            return NameResolution::Named(name.clone());
        }
        if let Some(alias) = self.oracle.alias(ty) {
            if !is_placeholder(&alias.name) {
                return self.instantiation_name(&alias.name, &alias.type_arguments);
            }
        }
        if self.oracle.flags(ty).contains(TypeFlags::ENUM_LITERAL) {
            if let Some(symbol) = self.oracle.symbol_name(ty) {
                if !is_placeholder(&symbol) {
                    return NameResolution::Named(symbol);
                }
            }
        }
        NameResolution::Anonymous
    }

    /// `Ref` for a union or intersection reached through its own members.
    pub(crate) fn cycle_reference(&mut self, ty: TypeId) -> Metadata {
        match self.alias_name(ty) {
            NameResolution::Named(name) => {
                debug!(type_id = ty.0, name = %name, "self-reference");
                self.self_referenced.insert(ty);
                Metadata::reference(name)
            }
            NameResolution::Unnameable(base) => {
                self.report_unnameable(&base);
                Metadata::any()
            }
            NameResolution::Anonymous => Metadata::any(),
        }
    }

    /// Register `node` when it is named, returning the `Ref` in its place.
    pub(crate) fn finish_alias(
        &mut self,
        ty: TypeId,
        node: Metadata,
        subfield_name: NameResolution,
        shape: AliasShape,
    ) -> Metadata {
        let self_referenced = self.self_referenced.remove(&ty);
        if self.is_phantom_node(&node) {
            return node;
        }
        let registrable = match (shape, &node.kind) {
            (AliasShape::Union, MetadataKind::Union(_)) => true,
            (AliasShape::Intersection, MetadataKind::Object(_) | MetadataKind::Intersection(_)) => {
                true
            }
            _ => false,
        };

        let name = match subfield_name {
            NameResolution::Named(name) if registrable || self_referenced => name,
            NameResolution::Unnameable(base) if registrable || self_referenced => {
                self.report_unnameable(&base);
                return node;
            }
            _ if self_referenced => match self.alias_name(ty) {
                NameResolution::Named(name) => name,
                NameResolution::Unnameable(base) => {
                    self.report_unnameable(&base);
                    return node;
                }
                NameResolution::Anonymous => return node,
            },
            _ => return node,
        };

        if !self.registry.has(&name) {
            let node = match node.kind {
                MetadataKind::Object(mut object) if object.name.is_none() => {
                    object.name = Some(name.clone());
                    Metadata {
                        kind: MetadataKind::Object(object),
                        ..node
                    }
                    .with_name(name.clone())
                }
                _ => node,
            };
            self.register(&name, node);
        }
        Metadata::reference(name)
    }
}
