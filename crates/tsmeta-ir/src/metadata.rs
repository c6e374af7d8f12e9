//! Metadata nodes.
//!
//! A `Metadata` value is a `MetadataKind` plus the modifiers every kind may
//! carry. Named object, union and intersection types are stored once in the
//! [`Registry`](crate::Registry) and referenced from everywhere else through
//! `MetadataKind::Ref`, so a node graph never owns a cycle.

use crate::constraints::Constraints;
use crate::discriminant::Discriminant;
use serde::{Deserialize, Serialize};
use tsmeta_common::LiteralValue;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub kind: MetadataKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    /// Declared name, when the node was recovered from a named declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Box<Constraints>>,
    /// Set on `Any` nodes produced by an exhausted walk budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Degradation>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum MetadataKind {
    Any,
    Unknown,
    Never,
    Void,
    Atomic(AtomicKind),
    Literal(LiteralValue),
    Object(ObjectMetadata),
    Array(Box<Metadata>),
    Tuple(Vec<TupleElement>),
    Union(UnionMetadata),
    Intersection(Vec<Metadata>),
    /// By-name pointer into the registry.
    Ref(String),
    Native(NativeMetadata),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomicKind {
    String,
    Number,
    Boolean,
    Bigint,
    Symbol,
    Null,
    Undefined,
}

impl AtomicKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Bigint => "bigint",
            Self::Symbol => "symbol",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Degradation {
    DepthExceeded,
    BreadthExceeded,
}

/// How unknown keys are treated when an object is validated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Strict,
    Strip,
    Passthrough,
}

impl Strictness {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "strict" => Some(Self::Strict),
            "strip" => Some(Self::Strip),
            "passthrough" => Some(Self::Passthrough),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<Box<IndexSignature>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strictness: Option<Strictness>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectMetadata {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexSignature {
    pub key: Metadata,
    pub value: Metadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Metadata,
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exact_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Box<Constraints>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub write_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: Metadata, required: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            required,
            readonly: false,
            exact_optional: false,
            constraints: None,
            description: None,
            write_only: false,
            example: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TupleElement {
    #[serde(rename = "type")]
    pub ty: Metadata,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnionMetadata {
    pub members: Vec<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminant: Option<Discriminant>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<Metadata>,
}

impl Metadata {
    pub fn new(kind: MetadataKind) -> Self {
        Self {
            kind,
            nullable: false,
            optional: false,
            name: None,
            constraints: None,
            degraded: None,
        }
    }

    pub fn any() -> Self {
        Self::new(MetadataKind::Any)
    }

    /// `Any` node standing in for a part of the graph a budget cut off.
    pub fn degraded(reason: Degradation) -> Self {
        Self {
            degraded: Some(reason),
            ..Self::any()
        }
    }

    pub fn atomic(kind: AtomicKind) -> Self {
        Self::new(MetadataKind::Atomic(kind))
    }

    pub fn literal(value: LiteralValue) -> Self {
        Self::new(MetadataKind::Literal(value))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(MetadataKind::Ref(name.into()))
    }

    pub fn native(name: impl Into<String>, type_arguments: Vec<Metadata>) -> Self {
        Self::new(MetadataKind::Native(NativeMetadata {
            name: name.into(),
            type_arguments,
        }))
    }

    pub fn object(object: ObjectMetadata) -> Self {
        Self::new(MetadataKind::Object(object))
    }

    pub fn array(element: Metadata) -> Self {
        Self::new(MetadataKind::Array(Box::new(element)))
    }

    pub fn union(members: Vec<Metadata>, discriminant: Option<Discriminant>) -> Self {
        Self::new(MetadataKind::Union(UnionMetadata {
            members,
            discriminant,
        }))
    }

    /// OR the given modifiers into the node.
    pub fn with_modifiers(mut self, nullable: bool, optional: bool) -> Self {
        self.nullable |= nullable;
        self.optional |= optional;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_constraints(mut self, constraints: Option<Box<Constraints>>) -> Self {
        self.constraints = constraints.filter(|c| !c.is_empty());
        self
    }

    pub fn is_any(&self) -> bool {
        matches!(self.kind, MetadataKind::Any)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, MetadataKind::Literal(_))
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match &self.kind {
            MetadataKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectMetadata> {
        match &self.kind {
            MetadataKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionMetadata> {
        match &self.kind {
            MetadataKind::Union(union) => Some(union),
            _ => None,
        }
    }

    pub fn ref_name(&self) -> Option<&str> {
        match &self.kind {
            MetadataKind::Ref(name) => Some(name),
            _ => None,
        }
    }

    /// Whether the node only carries compile-time branding markers.
    ///
    /// Objects are phantom when they have at least one property and every
    /// property name satisfies `is_marker`. Unions and intersections are
    /// phantom when every member is; nullability does not count.
    pub fn is_phantom(&self, is_marker: &dyn Fn(&str) -> bool) -> bool {
        match &self.kind {
            MetadataKind::Object(object) => {
                !object.properties.is_empty()
                    && object.properties.iter().all(|p| is_marker(&p.name))
            }
            MetadataKind::Union(union) => {
                !union.members.is_empty() && union.members.iter().all(|m| m.is_phantom(is_marker))
            }
            MetadataKind::Intersection(members) => {
                !members.is_empty() && members.iter().all(|m| m.is_phantom(is_marker))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/metadata_tests.rs"]
mod tests;
