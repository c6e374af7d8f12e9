//! Named and anonymous object analysis.

use crate::constraints::{property_annotations, type_annotations};
use crate::naming::{NameResolution, is_placeholder};
use crate::walker::TypeWalker;
use tracing::trace;
use tsmeta_ir::{IndexSignature, Metadata, ObjectMetadata, Property};
use tsmeta_oracle::{PropertyInfo, TypeId};

impl<'a> TypeWalker<'a> {
    pub(crate) fn walk_object(&mut self, ty: TypeId) -> Metadata {
        if self.is_phantom_type(ty) {
            return self.object_body(ty, None);
        }
        match self.object_name(ty) {
            NameResolution::Named(name) => self.named_object(ty, name),
            NameResolution::Unnameable(base) => {
                self.report_unnameable(&base);
                self.object_body(ty, None)
            }
            NameResolution::Anonymous => self.object_body(ty, None),
        }
    }

    /// Own symbol, then a name promoted by `walk_named`, then (below the top
    /// level) the declared alias.
    fn object_name(&mut self, ty: TypeId) -> NameResolution {
        if let Some(symbol) = self.oracle.symbol_name(ty) {
            if !is_placeholder(&symbol) {
                let args = self.oracle.type_arguments(ty);
                return self.instantiation_name(&symbol, &args);
            }
        }
        if let Some(name) = self.promoted_names.get(&ty) {
            return NameResolution::Named(name.clone());
        }
        if self.budget.depth() > 1 {
            if let Some(alias) = self.oracle.alias(ty) {
                if !is_placeholder(&alias.name) {
                    return self.instantiation_name(&alias.name, &alias.type_arguments);
                }
            }
        }
        NameResolution::Anonymous
    }

    fn named_object(&mut self, ty: TypeId, name: String) -> Metadata {
        if self.visiting.contains(&ty)
            || self.open_objects.contains(&name)
            || self.registry.has(&name)
        {
            trace!(name = %name, "object already known");
            return Metadata::reference(name);
        }

        self.visiting.insert(ty);
        self.open_objects.insert(name.clone());
        let saved = self.budget.begin_nested();
        let body = self.object_body(ty, Some(name.clone()));
        self.budget.end_nested(saved);
        self.open_objects.remove(&name);
        self.visiting.remove(&ty);

        self.register(&name, body);
        Metadata::reference(name)
    }

    fn object_body(&mut self, ty: TypeId, name: Option<String>) -> Metadata {
        let mut properties = Vec::new();
        for info in self.oracle.properties(ty) {
            if info.is_method {
                continue;
            }
            properties.push(self.property(info));
        }

        let index_signature = self
            .oracle
            .index_signatures(ty)
            .into_iter()
            .next()
            .map(|sig| {
                Box::new(IndexSignature {
                    key: self.walk(sig.key_type),
                    value: self.walk(sig.value_type),
                })
            });

        let annotations = type_annotations(&self.tags.type_tags(ty));
        let object = ObjectMetadata {
            name: name.clone(),
            properties,
            index_signature,
            strictness: annotations.strictness,
            ignore: annotations.ignore,
            description: annotations.description,
        };
        let node = Metadata::object(object);
        match name {
            Some(name) => node.with_name(name),
            None => node,
        }
    }

    /// Walk a property's type and merge its constraints.
    ///
    /// Constraints found on the walked type move onto the property; tags on
    /// the declaration win over them key by key.
    fn property(&mut self, info: PropertyInfo) -> Property {
        let mut ty = self.walk(info.type_id);
        let from_type = ty.constraints.take();

        let tags = info
            .declaration
            .map(|decl| self.tags.property_tags(decl))
            .unwrap_or_default();
        let annotations = property_annotations(&tags);

        let constraints = match (annotations.constraints, from_type) {
            (Some(doc), Some(brand)) => Some(Box::new(doc.merge_over(&brand))),
            (doc, brand) => doc.map(Box::new).or(brand),
        };

        Property {
            required: !info.optional && !ty.optional,
            readonly: info.readonly,
            exact_optional: info.exact_optional,
            constraints: constraints.filter(|c| !c.is_empty()),
            description: annotations.description,
            write_only: annotations.write_only,
            example: annotations.example,
            name: info.name,
            ty,
        }
    }
}
