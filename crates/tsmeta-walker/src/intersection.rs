//! Intersection analysis: brand detection, then flattening.
//!
//! ```typescript
//! type UserId = string & { __format: "uuid" };   // Atomic(String) + format
//! type Named = Base & { name: string };          // one merged Object
//! type Odd = string & number & { __min: 1 };     // explicit Intersection
//! ```

use crate::alias::AliasShape;
use crate::config::MergePolicy;
use crate::naming::NameResolution;
use crate::walker::TypeWalker;
use tracing::trace;
use tsmeta_ir::{Metadata, MetadataKind, ObjectMetadata};
use tsmeta_oracle::{TypeFlags, TypeId};

impl<'a> TypeWalker<'a> {
    pub(crate) fn walk_intersection(&mut self, ty: TypeId) -> Metadata {
        if self.visiting.contains(&ty) {
            return self.cycle_reference(ty);
        }
        let members = self.oracle.intersection_members(ty);
        if let [only] = members.as_slice() {
            return self.walk(*only);
        }
        if let Some(node) = self.branded(&members) {
            return node;
        }

        let subfield_name = self.subfield_alias_name(ty);
        if let NameResolution::Named(name) = &subfield_name {
            if self.registry.has(name) {
                return Metadata::reference(name.clone());
            }
        }

        self.visiting.insert(ty);
        let walked: Vec<Metadata> = members.iter().map(|&member| self.walk(member)).collect();
        self.visiting.remove(&ty);

        let node = match self.flatten(&walked) {
            Some(object) => Metadata::object(object),
            None => Metadata::new(MetadataKind::Intersection(walked)),
        };
        self.finish_alias(ty, node, subfield_name, AliasShape::Intersection)
    }

    /// Exactly one brandable base plus at least one phantom object.
    fn branded(&mut self, members: &[TypeId]) -> Option<Metadata> {
        let mut base = None;
        let mut phantoms = Vec::new();
        for &member in members {
            if self.is_phantom_type(member) {
                phantoms.push(member);
            } else if base.is_none() && self.is_brandable_base(member) {
                base = Some(member);
            } else {
                return None;
            }
        }
        let base = base?;
        if phantoms.is_empty() {
            return None;
        }
        trace!(base = base.0, phantoms = phantoms.len(), "branded type");

        let mut node = self.walk(base);
        let extracted = self.extract_phantoms(&phantoms);
        let constraints = match (extracted, node.constraints.take()) {
            (Some(brand), Some(existing)) => Some(Box::new(brand.merge_over(&existing))),
            (brand, existing) => brand.or(existing),
        };
        Some(node.with_constraints(constraints))
    }

    fn is_brandable_base(&self, ty: TypeId) -> bool {
        self.oracle.flags(ty).intersects(
            TypeFlags::STRING
                | TypeFlags::NUMBER
                | TypeFlags::BOOLEAN
                | TypeFlags::BIGINT
                | TypeFlags::ES_SYMBOL
                | TypeFlags::LITERAL
                | TypeFlags::TEMPLATE_LITERAL,
        ) || self.oracle.is_array_type(ty)
    }

    /// Merge members that are all objects, directly or through registered refs.
    fn flatten(&self, members: &[Metadata]) -> Option<ObjectMetadata> {
        let mut merged = ObjectMetadata::default();
        for member in members {
            let object = match &member.kind {
                MetadataKind::Object(object) => object,
                MetadataKind::Ref(name) => self.registry.resolve(name)?.as_object()?,
                _ => return None,
            };
            for property in &object.properties {
                match merged.properties.iter().position(|p| p.name == property.name) {
                    Some(index) => {
                        if self.config.merge_policy == MergePolicy::LaterWins {
                            merged.properties[index] = property.clone();
                        }
                    }
                    None => merged.properties.push(property.clone()),
                }
            }
            let later_wins = self.config.merge_policy == MergePolicy::LaterWins;
            if object.index_signature.is_some() && (later_wins || merged.index_signature.is_none())
            {
                merged.index_signature = object.index_signature.clone();
            }
            if object.strictness.is_some() && (later_wins || merged.strictness.is_none()) {
                merged.strictness = object.strictness;
            }
            if object.description.is_some() && merged.description.is_none() {
                merged.description = object.description.clone();
            }
            merged.ignore |= object.ignore;
        }
        Some(merged)
    }
}
