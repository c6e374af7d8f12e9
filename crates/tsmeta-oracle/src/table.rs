//! In-memory type graph implementing [`TypeOracle`] and [`DocTagSource`].
//!
//! `TypeTable` plays the role of a checker for tests and offline runs. Types
//! are appended to a flat arena and addressed by [`TypeId`]; primitives and
//! `boolean` occupy the fixed ids declared on `TypeId`. Literal types are
//! interned, so two `literal_str("a")` calls return the same handle, matching
//! how a real checker hands out literal identities.
//!
//! A table round-trips through JSON (`to_json` / `from_json`), which lets a
//! front end snapshot the relevant part of a program once and replay it.

use crate::oracle::{DocTagSource, TypeOracle};
use crate::types::{
    AliasInfo, DeclId, DeclarationSource, DocTag, IndexSignatureInfo, PropertyInfo,
    TemplateLiteralInfo, TupleElementInfo, TypeFlags, TypeId,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tsmeta_common::LiteralValue;

/// Placeholder symbol a checker gives anonymous object literals.
const ANONYMOUS_SYMBOL: &str = "__type";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectShape {
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
    #[serde(default)]
    pub index_signatures: Vec<IndexSignatureInfo>,
    #[serde(default)]
    pub call_signatures: usize,
    #[serde(default)]
    pub type_arguments: Vec<TypeId>,
    /// Element type for arrays and for types extending an array.
    #[serde(default)]
    pub array_element: Option<TypeId>,
    #[serde(default)]
    pub builtin_array: bool,
    #[serde(default)]
    pub declaration: Option<DeclarationSource>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum TypeShape {
    Intrinsic,
    Literal { value: LiteralValue },
    Union { members: Vec<TypeId> },
    Intersection { members: Vec<TypeId> },
    Object(ObjectShape),
    Tuple { elements: Vec<TupleElementInfo> },
    Template(TemplateLiteralInfo),
    Deferred { constraint: Option<TypeId> },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeEntry {
    pub flags: TypeFlags,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub alias: Option<AliasInfo>,
    #[serde(flatten)]
    pub shape: TypeShape,
}

/// Error returned by [`TypeTable::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// `owner` refers to a type id that is not in the table.
    DanglingType { owner: TypeId, target: TypeId },
    /// The fixed primitive ids are missing or were overwritten.
    MissingIntrinsics { found: usize },
    /// The snapshot is not valid JSON for a type table.
    Snapshot(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingType { owner, target } => write!(
                f,
                "type {} refers to type {} which is not in the table",
                owner.0, target.0
            ),
            Self::MissingIntrinsics { found } => write!(
                f,
                "table has {found} entries but the first {} are reserved for intrinsic types",
                TypeId::FIRST_USER
            ),
            Self::Snapshot(message) => write!(f, "invalid type table snapshot: {message}"),
        }
    }
}

impl std::error::Error for TableError {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeTable {
    types: Vec<TypeEntry>,
    #[serde(default)]
    property_tags: Vec<(DeclId, DocTag)>,
    #[serde(default)]
    type_tags: Vec<(TypeId, DocTag)>,
    #[serde(default)]
    next_decl: u32,
    #[serde(skip)]
    literals: FxHashMap<String, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::new(),
            property_tags: Vec::new(),
            type_tags: Vec::new(),
            next_decl: 1,
            literals: FxHashMap::default(),
        };
        let intrinsics = [
            TypeFlags::ANY,
            TypeFlags::UNKNOWN,
            TypeFlags::NEVER,
            TypeFlags::VOID,
            TypeFlags::UNDEFINED,
            TypeFlags::NULL,
            TypeFlags::STRING,
            TypeFlags::NUMBER,
            TypeFlags::BIGINT,
            TypeFlags::ES_SYMBOL,
        ];
        for flags in intrinsics {
            table.push(flags, TypeShape::Intrinsic);
        }
        let f = table.push(
            TypeFlags::BOOLEAN_LITERAL,
            TypeShape::Literal {
                value: LiteralValue::Boolean(false),
            },
        );
        let t = table.push(
            TypeFlags::BOOLEAN_LITERAL,
            TypeShape::Literal {
                value: LiteralValue::Boolean(true),
            },
        );
        table.push(
            TypeFlags::BOOLEAN | TypeFlags::UNION,
            TypeShape::Union {
                members: vec![f, t],
            },
        );
        table.push(TypeFlags::NON_PRIMITIVE, TypeShape::Intrinsic);
        debug_assert_eq!(table.types.len() as u32, TypeId::FIRST_USER);
        table.reindex_literals();
        table
    }

    /// Parse a JSON snapshot and check it for dangling references.
    pub fn from_json(source: &str) -> Result<Self, TableError> {
        let mut table: Self =
            serde_json::from_str(source).map_err(|err| TableError::Snapshot(err.to_string()))?;
        table.reindex_literals();
        table.validate()?;
        Ok(table)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check that every type id mentioned anywhere resolves to an entry.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.types.len() < TypeId::FIRST_USER as usize {
            return Err(TableError::MissingIntrinsics {
                found: self.types.len(),
            });
        }
        for (index, entry) in self.types.iter().enumerate() {
            let owner = TypeId(index as u32);
            for target in referenced_ids(entry) {
                if target.0 as usize >= self.types.len() {
                    return Err(TableError::DanglingType { owner, target });
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Builder API
    // -----------------------------------------------------------------------

    fn push(&mut self, flags: TypeFlags, shape: TypeShape) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeEntry {
            flags,
            symbol: None,
            alias: None,
            shape,
        });
        id
    }

    fn reindex_literals(&mut self) {
        self.literals.clear();
        for (index, entry) in self.types.iter().enumerate() {
            if entry.flags.contains(TypeFlags::ENUM_LITERAL) {
                continue;
            }
            if let TypeShape::Literal { value } = &entry.shape {
                self.literals
                    .entry(value.intern_key())
                    .or_insert(TypeId(index as u32));
            }
        }
    }

    fn entry(&self, ty: TypeId) -> Option<&TypeEntry> {
        self.types.get(ty.0 as usize)
    }

    fn entry_mut(&mut self, ty: TypeId) -> Option<&mut TypeEntry> {
        self.types.get_mut(ty.0 as usize)
    }

    fn object_shape(&self, ty: TypeId) -> Option<&ObjectShape> {
        match &self.entry(ty)?.shape {
            TypeShape::Object(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeId {
        let key = value.intern_key();
        if let Some(&id) = self.literals.get(&key) {
            return id;
        }
        let flags = match &value {
            LiteralValue::Boolean(_) => TypeFlags::BOOLEAN_LITERAL,
            LiteralValue::Number(_) => TypeFlags::NUMBER_LITERAL,
            LiteralValue::String(_) => TypeFlags::STRING_LITERAL,
            LiteralValue::Bigint(_) => TypeFlags::BIGINT_LITERAL,
        };
        let id = self.push(flags, TypeShape::Literal { value });
        self.literals.insert(key, id);
        id
    }

    pub fn literal_str(&mut self, value: &str) -> TypeId {
        self.literal(LiteralValue::String(value.to_string()))
    }

    pub fn literal_num(&mut self, value: f64) -> TypeId {
        self.literal(LiteralValue::Number(value))
    }

    pub fn literal_bool(&mut self, value: bool) -> TypeId {
        if value {
            TypeId::BOOLEAN_TRUE
        } else {
            TypeId::BOOLEAN_FALSE
        }
    }

    /// Union of `members`, flattening nested unions and dropping duplicates.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match self.entry(member).map(|e| &e.shape) {
                Some(TypeShape::Union { members: inner }) => {
                    for &m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        self.push(TypeFlags::UNION, TypeShape::Union { members: flat })
    }

    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        self.push(TypeFlags::INTERSECTION, TypeShape::Intersection { members })
    }

    /// Anonymous object literal type.
    pub fn object(&mut self, properties: Vec<PropertyInfo>) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                properties,
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, ANONYMOUS_SYMBOL);
        id
    }

    /// Named interface or class instance type.
    pub fn interface(&mut self, name: &str, properties: Vec<PropertyInfo>) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                properties,
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, name);
        id
    }

    /// Reserve a named object whose properties refer back to it.
    pub fn declare_interface(&mut self, name: &str) -> TypeId {
        self.interface(name, Vec::new())
    }

    /// Fill in the properties of a previously declared object.
    pub fn define_properties(&mut self, ty: TypeId, properties: Vec<PropertyInfo>) {
        if let Some(TypeEntry {
            shape: TypeShape::Object(shape),
            ..
        }) = self.entry_mut(ty)
        {
            shape.properties = properties;
        }
    }

    /// Instantiation of a generic interface (`Page<User>`).
    pub fn instantiate(
        &mut self,
        name: &str,
        type_arguments: Vec<TypeId>,
        properties: Vec<PropertyInfo>,
    ) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                properties,
                type_arguments,
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, name);
        id
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                type_arguments: vec![element],
                array_element: Some(element),
                builtin_array: true,
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, "Array");
        id
    }

    /// Named interface that extends `Array<element>`.
    pub fn array_subtype(&mut self, name: &str, element: TypeId) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                array_element: Some(element),
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, name);
        id
    }

    pub fn tuple(&mut self, elements: Vec<TupleElementInfo>) -> TypeId {
        self.push(TypeFlags::OBJECT, TypeShape::Tuple { elements })
    }

    /// Well-known library type such as `Date`, `Promise<T>` or `Map<K, V>`.
    pub fn library(&mut self, name: &str, type_arguments: Vec<TypeId>) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                type_arguments,
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, name);
        id
    }

    /// Type of a declared function (`typeof isEmail`).
    pub fn function(&mut self, name: &str, module_path: &str) -> TypeId {
        let id = self.push(
            TypeFlags::OBJECT,
            TypeShape::Object(ObjectShape {
                call_signatures: 1,
                declaration: Some(DeclarationSource {
                    name: name.to_string(),
                    module_path: module_path.to_string(),
                }),
                ..ObjectShape::default()
            }),
        );
        self.set_symbol(id, name);
        id
    }

    pub fn template(&mut self, texts: Vec<String>, slots: Vec<TypeId>) -> TypeId {
        self.push(
            TypeFlags::TEMPLATE_LITERAL,
            TypeShape::Template(TemplateLiteralInfo { texts, slots }),
        )
    }

    pub fn type_parameter(&mut self, name: &str, constraint: Option<TypeId>) -> TypeId {
        let id = self.push(TypeFlags::TYPE_PARAMETER, TypeShape::Deferred { constraint });
        self.set_symbol(id, name);
        id
    }

    /// Enum declaration: a named union of enum literal members.
    pub fn enumeration(&mut self, name: &str, members: &[(&str, LiteralValue)]) -> TypeId {
        let mut ids = Vec::with_capacity(members.len());
        for (member_name, value) in members {
            let flags = TypeFlags::ENUM_LITERAL
                | match value {
                    LiteralValue::Number(_) => TypeFlags::NUMBER_LITERAL,
                    _ => TypeFlags::STRING_LITERAL,
                };
            let id = self.push(
                flags,
                TypeShape::Literal {
                    value: value.clone(),
                },
            );
            self.set_symbol(id, member_name);
            ids.push(id);
        }
        let id = self.push(
            TypeFlags::UNION | TypeFlags::ENUM_LITERAL,
            TypeShape::Union { members: ids },
        );
        self.set_symbol(id, name);
        id
    }

    pub fn set_symbol(&mut self, ty: TypeId, name: &str) {
        if let Some(entry) = self.entry_mut(ty) {
            entry.symbol = Some(name.to_string());
        }
    }

    /// Record that `ty` was reached through alias `name<type_arguments>`.
    pub fn set_alias(&mut self, ty: TypeId, name: &str, type_arguments: Vec<TypeId>) {
        if let Some(entry) = self.entry_mut(ty) {
            entry.alias = Some(AliasInfo {
                name: name.to_string(),
                type_arguments,
            });
        }
    }

    pub fn add_index_signature(&mut self, ty: TypeId, key_type: TypeId, value_type: TypeId) {
        if let Some(TypeEntry {
            shape: TypeShape::Object(shape),
            ..
        }) = self.entry_mut(ty)
        {
            shape.index_signatures.push(IndexSignatureInfo {
                key_type,
                value_type,
            });
        }
    }

    pub fn add_call_signature(&mut self, ty: TypeId) {
        if let Some(TypeEntry {
            shape: TypeShape::Object(shape),
            ..
        }) = self.entry_mut(ty)
        {
            shape.call_signatures += 1;
        }
    }

    /// Allocate a declaration handle for a property that carries doc tags.
    pub fn declaration(&mut self) -> DeclId {
        let id = DeclId(self.next_decl);
        self.next_decl += 1;
        id
    }

    pub fn tag_property(&mut self, decl: DeclId, name: &str, text: &str) {
        self.property_tags.push((decl, DocTag::new(name, text)));
    }

    pub fn tag_type(&mut self, ty: TypeId, name: &str, text: &str) {
        self.type_tags.push((ty, DocTag::new(name, text)));
    }
}

fn referenced_ids(entry: &TypeEntry) -> Vec<TypeId> {
    let mut out = Vec::new();
    if let Some(alias) = &entry.alias {
        out.extend(alias.type_arguments.iter().copied());
    }
    match &entry.shape {
        TypeShape::Intrinsic | TypeShape::Literal { .. } => {}
        TypeShape::Union { members } | TypeShape::Intersection { members } => {
            out.extend(members.iter().copied());
        }
        TypeShape::Object(shape) => {
            out.extend(shape.properties.iter().map(|p| p.type_id));
            for sig in &shape.index_signatures {
                out.push(sig.key_type);
                out.push(sig.value_type);
            }
            out.extend(shape.type_arguments.iter().copied());
            out.extend(shape.array_element);
        }
        TypeShape::Tuple { elements } => out.extend(elements.iter().map(|e| e.type_id)),
        TypeShape::Template(info) => out.extend(info.slots.iter().copied()),
        TypeShape::Deferred { constraint } => out.extend(*constraint),
    }
    out
}

// ---------------------------------------------------------------------------
// Oracle implementation
// ---------------------------------------------------------------------------

impl TypeOracle for TypeTable {
    fn flags(&self, ty: TypeId) -> TypeFlags {
        self.entry(ty).map(|e| e.flags).unwrap_or(TypeFlags::empty())
    }

    fn symbol_name(&self, ty: TypeId) -> Option<String> {
        self.entry(ty)?.symbol.clone()
    }

    fn alias(&self, ty: TypeId) -> Option<AliasInfo> {
        self.entry(ty)?.alias.clone()
    }

    fn properties(&self, ty: TypeId) -> Vec<PropertyInfo> {
        self.object_shape(ty)
            .map(|shape| shape.properties.clone())
            .unwrap_or_default()
    }

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        self.object_shape(ty)
            .map(|shape| shape.type_arguments.clone())
            .unwrap_or_default()
    }

    fn union_members(&self, ty: TypeId) -> Vec<TypeId> {
        match self.entry(ty).map(|e| &e.shape) {
            Some(TypeShape::Union { members }) => members.clone(),
            _ => Vec::new(),
        }
    }

    fn intersection_members(&self, ty: TypeId) -> Vec<TypeId> {
        match self.entry(ty).map(|e| &e.shape) {
            Some(TypeShape::Intersection { members }) => members.clone(),
            _ => Vec::new(),
        }
    }

    fn is_array_type(&self, ty: TypeId) -> bool {
        self.object_shape(ty).is_some_and(|shape| shape.builtin_array)
    }

    fn array_element_type(&self, ty: TypeId) -> Option<TypeId> {
        self.object_shape(ty)?.array_element
    }

    fn is_tuple_type(&self, ty: TypeId) -> bool {
        matches!(
            self.entry(ty).map(|e| &e.shape),
            Some(TypeShape::Tuple { .. })
        )
    }

    fn tuple_elements(&self, ty: TypeId) -> Vec<TupleElementInfo> {
        match self.entry(ty).map(|e| &e.shape) {
            Some(TypeShape::Tuple { elements }) => elements.clone(),
            _ => Vec::new(),
        }
    }

    fn call_signature_count(&self, ty: TypeId) -> usize {
        self.object_shape(ty)
            .map(|shape| shape.call_signatures)
            .unwrap_or(0)
    }

    fn index_signatures(&self, ty: TypeId) -> Vec<IndexSignatureInfo> {
        self.object_shape(ty)
            .map(|shape| shape.index_signatures.clone())
            .unwrap_or_default()
    }

    fn literal_value(&self, ty: TypeId) -> Option<LiteralValue> {
        match &self.entry(ty)?.shape {
            TypeShape::Literal { value } => Some(value.clone()),
            _ => None,
        }
    }

    fn template_literal(&self, ty: TypeId) -> Option<TemplateLiteralInfo> {
        match &self.entry(ty)?.shape {
            TypeShape::Template(info) => Some(info.clone()),
            _ => None,
        }
    }

    fn base_constraint(&self, ty: TypeId) -> Option<TypeId> {
        match &self.entry(ty)?.shape {
            TypeShape::Deferred { constraint } => *constraint,
            _ => None,
        }
    }

    fn declaration_source(&self, ty: TypeId) -> Option<DeclarationSource> {
        self.object_shape(ty)?.declaration.clone()
    }
}

impl DocTagSource for TypeTable {
    fn property_tags(&self, decl: DeclId) -> Vec<DocTag> {
        self.property_tags
            .iter()
            .filter(|(owner, _)| *owner == decl)
            .map(|(_, tag)| tag.clone())
            .collect()
    }

    fn type_tags(&self, ty: TypeId) -> Vec<DocTag> {
        self.type_tags
            .iter()
            .filter(|(owner, _)| *owner == ty)
            .map(|(_, tag)| tag.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
