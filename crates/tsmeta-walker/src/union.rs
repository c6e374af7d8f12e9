//! Union analysis.
//!
//! Members are partitioned before anything is walked: `null` and `undefined`
//! become modifiers, a `true`/`false` pair folds back into `boolean`, and
//! scalar literals (including enum members) convert without a recursive walk.
//! Large enumerations therefore cost nothing against the breadth budget,
//! including uniformly branded ones such as
//!
//! ```typescript
//! type Code = ("A01" & { __pattern: "^[A-Z]\\d+$" }) | ("B02" & { __pattern: "^[A-Z]\\d+$" });
//! ```
//!
//! where the phantom shape is inspected once and its constraints reused.

use crate::alias::AliasShape;
use crate::discriminant::find_discriminant;
use crate::naming::{NameResolution, is_placeholder};
use crate::walker::TypeWalker;
use tracing::{Level, span, trace};
use tsmeta_common::LiteralValue;
use tsmeta_ir::{AtomicKind, Constraints, Metadata};
use tsmeta_oracle::{TypeFlags, TypeId};

/// Members of a union after partitioning.
#[derive(Default)]
struct Partition {
    /// `None` reserves the position of the folded boolean.
    slots: Vec<Option<Metadata>>,
    nullable: bool,
    optional: bool,
    seen_true: bool,
    seen_false: bool,
    /// Constraints of the first branded literal shape met.
    brand: Option<Box<Constraints>>,
    brand_seen: bool,
}

impl Partition {
    fn push_boolean(&mut self, value: bool) {
        if !self.seen_true && !self.seen_false {
            self.slots.push(None);
        }
        if value {
            self.seen_true = true;
        } else {
            self.seen_false = true;
        }
    }

    fn boolean(&self) -> Metadata {
        if self.seen_true && self.seen_false {
            Metadata::atomic(AtomicKind::Boolean)
        } else {
            Metadata::literal(LiteralValue::Boolean(self.seen_true))
        }
    }

    fn into_members(self) -> (Vec<Metadata>, Option<Box<Constraints>>, bool, bool) {
        let boolean = self.boolean();
        let members = self
            .slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| boolean.clone()))
            .collect();
        (members, self.brand, self.nullable, self.optional)
    }
}

impl<'a> TypeWalker<'a> {
    pub(crate) fn walk_union(&mut self, ty: TypeId) -> Metadata {
        if self.visiting.contains(&ty) {
            return self.cycle_reference(ty);
        }
        let subfield_name = self.subfield_alias_name(ty);
        if let NameResolution::Named(name) = &subfield_name {
            if self.registry.has(name) {
                return Metadata::reference(name.clone());
            }
        }

        self.visiting.insert(ty);
        let node = self.union_body(ty);
        self.visiting.remove(&ty);

        self.finish_alias(ty, node, subfield_name, AliasShape::Union)
    }

    fn union_body(&mut self, ty: TypeId) -> Metadata {
        let mut partition = Partition::default();
        for member in self.oracle.union_members(ty) {
            let flags = self.oracle.flags(member);
            if flags.contains(TypeFlags::NULL) {
                partition.nullable = true;
                continue;
            }
            if flags.intersects(TypeFlags::UNDEFINED | TypeFlags::VOID) {
                partition.optional = true;
                continue;
            }
            if flags.contains(TypeFlags::BOOLEAN_LITERAL) {
                if let Some(LiteralValue::Boolean(value)) = self.oracle.literal_value(member) {
                    partition.push_boolean(value);
                    continue;
                }
            }
            if flags.intersects(TypeFlags::SCALAR_LITERAL) {
                if let Some(value) = self.oracle.literal_value(member) {
                    partition.slots.push(Some(Metadata::literal(value)));
                    continue;
                }
            }
            if flags.contains(TypeFlags::INTERSECTION) {
                if let Some((value, constraints)) = self.branded_literal(member) {
                    if !partition.brand_seen {
                        partition.brand_seen = true;
                        partition.brand = constraints;
                    }
                    partition.slots.push(Some(Metadata::literal(value)));
                    continue;
                }
            }
            let node = self.walk(member);
            partition.slots.push(Some(node));
        }

        let (mut members, brand, nullable, optional) = partition.into_members();
        let node = match members.len() {
            0 => Metadata::any(),
            1 => {
                let only = members.remove(0);
                if only.is_literal() && only.constraints.is_none() {
                    only.with_constraints(brand)
                } else {
                    only
                }
            }
            _ => self.collapse(ty, members, brand),
        };
        node.with_modifiers(nullable, optional)
    }

    fn collapse(
        &mut self,
        ty: TypeId,
        members: Vec<Metadata>,
        brand: Option<Box<Constraints>>,
    ) -> Metadata {
        let all_literal = members.iter().all(Metadata::is_literal);
        let discriminant = find_discriminant(&members, &self.registry);
        let node = Metadata::union(members, discriminant);
        if !all_literal {
            return node;
        }
        let node = node.with_constraints(brand);
        match self.literal_union_name(ty) {
            Some(name) => node.with_name(name),
            None => node,
        }
    }

    /// Alias name, else the declared symbol of an enum.
    fn literal_union_name(&self, ty: TypeId) -> Option<String> {
        self.oracle
            .alias(ty)
            .map(|alias| alias.name)
            .filter(|name| !is_placeholder(name))
            .or_else(|| self.oracle.symbol_name(ty).filter(|name| !is_placeholder(name)))
    }

    /// `literal & phantom & ...`, recognized through oracle queries alone.
    fn branded_literal(
        &mut self,
        ty: TypeId,
    ) -> Option<(LiteralValue, Option<Box<Constraints>>)> {
        let mut literal = None;
        let mut phantoms = Vec::new();
        for part in self.oracle.intersection_members(ty) {
            if self.oracle.flags(part).intersects(TypeFlags::LITERAL) {
                if literal.is_some() {
                    return None;
                }
                literal = Some(self.oracle.literal_value(part)?);
            } else if self.is_phantom_type(part) {
                phantoms.push(part);
            } else {
                return None;
            }
        }
        let literal = literal?;
        if phantoms.is_empty() {
            return None;
        }
        Some((literal, self.cached_brand(phantoms)))
    }

    fn cached_brand(&mut self, mut phantoms: Vec<TypeId>) -> Option<Box<Constraints>> {
        phantoms.sort_unstable();
        if let Some(cached) = self.branded_literals.get(&phantoms) {
            trace!(?phantoms, "branded literal cache hit");
            return cached.clone();
        }
        let _span = span!(Level::TRACE, "branded_literal", ?phantoms).entered();
        let constraints = self.extract_phantoms(&phantoms);
        self.branded_literals.insert(phantoms, constraints.clone());
        constraints
    }
}
