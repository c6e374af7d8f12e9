//! Read-only traversal over node graphs.
//!
//! Nodes never own what a `Ref` points at, so these walks stop at refs and
//! terminate on any graph the walker can produce.

use crate::metadata::{Metadata, MetadataKind};

/// Call `f` with the target name of every `Ref` reachable from `node`.
pub fn for_each_ref(node: &Metadata, f: &mut dyn FnMut(&str)) {
    match &node.kind {
        MetadataKind::Ref(name) => f(name),
        MetadataKind::Object(object) => {
            for property in &object.properties {
                for_each_ref(&property.ty, f);
            }
            if let Some(index) = &object.index_signature {
                for_each_ref(&index.key, f);
                for_each_ref(&index.value, f);
            }
        }
        MetadataKind::Array(element) => for_each_ref(element, f),
        MetadataKind::Tuple(elements) => {
            for element in elements {
                for_each_ref(&element.ty, f);
            }
        }
        MetadataKind::Union(union) => {
            for member in &union.members {
                for_each_ref(member, f);
            }
        }
        MetadataKind::Intersection(members) => {
            for member in members {
                for_each_ref(member, f);
            }
        }
        MetadataKind::Native(native) => {
            for argument in &native.type_arguments {
                for_each_ref(argument, f);
            }
        }
        MetadataKind::Any
        | MetadataKind::Unknown
        | MetadataKind::Never
        | MetadataKind::Void
        | MetadataKind::Atomic(_)
        | MetadataKind::Literal(_) => {}
    }
}

impl Metadata {
    /// Distinct ref targets reachable from this node, in first-seen order.
    pub fn referenced_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for_each_ref(self, &mut |name| {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        });
        names
    }
}
