//! Discriminant detection for unions of objects.
//!
//! A discriminant property is one where:
//! 1. Every member has the property
//! 2. Its type is a literal in every member
//! 3. No two members share the literal (`"1"` and `1` are different literals)
//!
//! ```typescript
//! type Shape = { kind: "circle"; r: number } | { kind: "square"; side: number };
//! ```
//!
//! Only the first member's properties are candidates, in declaration order,
//! and the first one that qualifies wins.

use indexmap::IndexMap;
use tracing::{Level, span, trace};
use tsmeta_common::LiteralValue;
use tsmeta_ir::{Discriminant, Metadata, ObjectMetadata, Registry};

/// Members may be inline objects or `Ref`s to registered objects.
pub(crate) fn find_discriminant(members: &[Metadata], registry: &Registry) -> Option<Discriminant> {
    let _span = span!(Level::TRACE, "find_discriminant", members = members.len()).entered();

    if members.len() < 2 {
        return None;
    }
    let mut objects = Vec::with_capacity(members.len());
    for member in members {
        let Some(object) = resolve_object(member, registry) else {
            trace!("non-object member, no discriminant");
            return None;
        };
        objects.push(object);
    }

    let (first, rest) = objects.split_first()?;
    for candidate in &first.properties {
        let Some(mapping) = literal_mapping(&candidate.name, first, rest) else {
            continue;
        };
        trace!(property = %candidate.name, "found discriminant");
        return Some(Discriminant {
            property_name: candidate.name.clone(),
            mapping,
        });
    }
    None
}

/// Member index per literal value, keyed by [`LiteralValue::to_key`].
///
/// Values are compared as literals, so `"1"` and `1` are distinct. When two
/// of them render to the same key, every key falls back to the quoting
/// `Display` form (`"1"` and `1`).
fn literal_mapping(
    name: &str,
    first: &ObjectMetadata,
    rest: &[&ObjectMetadata],
) -> Option<IndexMap<String, usize>> {
    let mut values: Vec<&LiteralValue> = Vec::with_capacity(rest.len() + 1);
    for object in std::iter::once(first).chain(rest.iter().copied()) {
        let value = object.property(name)?.ty.as_literal()?;
        if values.contains(&value) {
            return None;
        }
        values.push(value);
    }

    let mapping: IndexMap<String, usize> = values
        .iter()
        .enumerate()
        .map(|(index, value)| (value.to_key(), index))
        .collect();
    if mapping.len() == values.len() {
        return Some(mapping);
    }
    trace!(property = name, "literal keys collide across kinds; quoting");
    Some(
        values
            .iter()
            .enumerate()
            .map(|(index, value)| (value.to_string(), index))
            .collect(),
    )
}

fn resolve_object<'r>(member: &'r Metadata, registry: &'r Registry) -> Option<&'r ObjectMetadata> {
    match member.ref_name() {
        Some(name) => registry.resolve(name)?.as_object(),
        None => member.as_object(),
    }
}
