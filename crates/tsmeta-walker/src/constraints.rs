//! Constraint extraction from phantom objects and documentation tags.
//!
//! A phantom object carries no runtime data: every property name follows the
//! branding convention (`__minLength`, or the compatibility tag property).
//! Intersecting a base type with phantoms attaches validation constraints to
//! it without changing its runtime representation:
//!
//! ```typescript
//! type Username = string & { __minLength: 3; __minLength_error: "too short" };
//! type Email = string & { "~tag": { kind: "format"; value: "email" } };
//! ```
//!
//! All sources map keys through [`ConstraintKey`]; unknown keys are inert.

use crate::walker::TypeWalker;
use serde_json::Value;
use tracing::trace;
use tsmeta_common::LiteralValue;
use tsmeta_ir::{ConstraintKey, Constraints, Strictness, ValidatorRef};
use tsmeta_oracle::{DocTag, TypeFlags, TypeId};

/// Marker key holding the message reported for any failed constraint.
const ERROR_KEY: &str = "error";
/// Marker key holding a reference to a validation function.
const VALIDATE_KEY: &str = "validate";
/// Suffix of marker keys holding the message for one constraint.
const ERROR_SUFFIX: &str = "_error";

impl<'a> TypeWalker<'a> {
    /// Whether `ty` is an object type whose every property is a marker.
    pub(crate) fn is_phantom_type(&self, ty: TypeId) -> bool {
        if !self.oracle.flags(ty).contains(TypeFlags::OBJECT)
            || self.oracle.is_array_type(ty)
            || self.oracle.is_tuple_type(ty)
        {
            return false;
        }
        let properties = self.oracle.properties(ty);
        !properties.is_empty() && properties.iter().all(|p| self.config.is_marker(&p.name))
    }

    /// Merge the constraints carried by `phantoms`, in order.
    pub(crate) fn extract_phantoms(&self, phantoms: &[TypeId]) -> Option<Box<Constraints>> {
        let mut constraints = Constraints::default();
        for &phantom in phantoms {
            for property in self.oracle.properties(phantom) {
                if property.name == self.config.compat_tag_property {
                    self.apply_compat_tag(&mut constraints, property.type_id);
                    continue;
                }
                let Some(key) = property.name.strip_prefix(self.config.brand_prefix.as_str())
                else {
                    continue;
                };
                self.apply_marker(&mut constraints, key, property.type_id);
            }
        }
        trace!(?phantoms, empty = constraints.is_empty(), "extracted brand constraints");
        (!constraints.is_empty()).then(|| Box::new(constraints))
    }

    fn apply_marker(&self, constraints: &mut Constraints, key: &str, value_type: TypeId) {
        if key == VALIDATE_KEY {
            constraints.validator = self.validator_ref(value_type);
            return;
        }
        let Some(value) = self.marker_value(value_type) else {
            return;
        };
        if key == ERROR_KEY {
            if let Some(message) = value.as_str() {
                constraints.error_message = Some(message.to_string());
            }
            return;
        }
        if let Some(base) = key.strip_suffix(ERROR_SUFFIX) {
            if let (Some(key), Some(message)) = (ConstraintKey::from_name(base), value.as_str()) {
                key.set_error_message(constraints, message);
            }
            return;
        }
        if let Some(key) = ConstraintKey::from_name(key) {
            key.apply(constraints, &value);
        }
    }

    /// `{ kind, value, message? }`, possibly nullable or a union of several tags.
    fn apply_compat_tag(&self, constraints: &mut Constraints, tag_type: TypeId) {
        let tags = if self.oracle.flags(tag_type).contains(TypeFlags::UNION) {
            self.oracle.union_members(tag_type)
        } else {
            vec![tag_type]
        };
        for tag in tags {
            if self
                .oracle
                .flags(tag)
                .intersects(TypeFlags::NULL | TypeFlags::UNDEFINED)
            {
                continue;
            }
            let properties = self.oracle.properties(tag);
            let field = |name: &str| properties.iter().find(|p| p.name == name).map(|p| p.type_id);

            let Some(kind) = field("kind")
                .and_then(|ty| self.marker_value(ty))
                .and_then(|v| v.as_str().map(str::to_string))
            else {
                continue;
            };
            if kind == VALIDATE_KEY {
                constraints.validator = field("value").and_then(|ty| self.validator_ref(ty));
                continue;
            }
            let Some(key) = ConstraintKey::from_name(&kind) else {
                continue;
            };
            let value = field("value")
                .and_then(|ty| self.marker_value(ty))
                .unwrap_or(LiteralValue::Boolean(true));
            key.apply(constraints, &value);
            if let Some(message) = field("message")
                .and_then(|ty| self.marker_value(ty))
                .and_then(|v| v.as_str().map(str::to_string))
            {
                key.set_error_message(constraints, &message);
            }
        }
    }

    /// Literal value of a marker, looking through `| undefined`.
    fn marker_value(&self, ty: TypeId) -> Option<LiteralValue> {
        if let Some(value) = self.oracle.literal_value(ty) {
            return Some(value);
        }
        if !self.oracle.flags(ty).contains(TypeFlags::UNION) {
            return None;
        }
        let mut defined = self.oracle.union_members(ty).into_iter().filter(|&m| {
            !self
                .oracle
                .flags(m)
                .intersects(TypeFlags::UNDEFINED | TypeFlags::NULL)
        });
        match (defined.next(), defined.next()) {
            (Some(only), None) => self.oracle.literal_value(only),
            _ => None,
        }
    }

    fn validator_ref(&self, function_type: TypeId) -> Option<ValidatorRef> {
        self.oracle
            .declaration_source(function_type)
            .map(|source| ValidatorRef {
                function_name: source.name,
                module_path: source.module_path,
            })
    }
}

// ---------------------------------------------------------------------------
// Documentation tags
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct PropertyAnnotations {
    pub constraints: Option<Constraints>,
    pub description: Option<String>,
    pub write_only: bool,
    pub example: Option<Value>,
}

#[derive(Debug, Default)]
pub(crate) struct TypeAnnotations {
    pub strictness: Option<Strictness>,
    pub ignore: bool,
    pub description: Option<String>,
}

/// Map tags on a property declaration (`@minLength 3`, `@description ...`).
pub(crate) fn property_annotations(tags: &[DocTag]) -> PropertyAnnotations {
    let mut annotations = PropertyAnnotations::default();
    let mut constraints = Constraints::default();
    for tag in tags {
        let text = tag.text.trim();
        match tag.name.as_str() {
            "description" => annotations.description = Some(text.to_string()),
            "example" => {
                annotations.example = Some(
                    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
                );
            }
            "writeOnly" => annotations.write_only = true,
            ERROR_KEY => constraints.error_message = Some(text.to_string()),
            name => {
                if let Some(key) = ConstraintKey::from_name(name) {
                    key.apply_text(&mut constraints, text);
                }
            }
        }
    }
    annotations.constraints = (!constraints.is_empty()).then_some(constraints);
    annotations
}

/// Map tags on a type declaration (`@strict`, `@ignore`, `@description ...`).
pub(crate) fn type_annotations(tags: &[DocTag]) -> TypeAnnotations {
    let mut annotations = TypeAnnotations::default();
    for tag in tags {
        match tag.name.as_str() {
            "ignore" => annotations.ignore = true,
            "description" => annotations.description = Some(tag.text.trim().to_string()),
            name => {
                if let Some(strictness) = Strictness::from_tag(name) {
                    annotations.strictness = Some(strictness);
                }
            }
        }
    }
    annotations
}

#[cfg(test)]
#[path = "../tests/constraints_tests.rs"]
mod tests;
