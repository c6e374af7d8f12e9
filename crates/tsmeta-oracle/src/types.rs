//! Handles and records exchanged with the oracle.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Opaque, stable identity of a type inside one oracle.
///
/// Two handles compare equal exactly when the oracle considers them the same
/// type (interned identity), which is what the walker's cycle guards key on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: Self = Self(0);
    pub const UNKNOWN: Self = Self(1);
    pub const NEVER: Self = Self(2);
    pub const VOID: Self = Self(3);
    pub const UNDEFINED: Self = Self(4);
    pub const NULL: Self = Self(5);
    pub const STRING: Self = Self(6);
    pub const NUMBER: Self = Self(7);
    pub const BIGINT: Self = Self(8);
    pub const SYMBOL: Self = Self(9);
    pub const BOOLEAN_FALSE: Self = Self(10);
    pub const BOOLEAN_TRUE: Self = Self(11);
    /// `boolean`, the union `false | true`.
    pub const BOOLEAN: Self = Self(12);
    /// The non-primitive `object` type.
    pub const OBJECT: Self = Self(13);

    /// First id available to user-built types.
    pub const FIRST_USER: u32 = 14;
}

/// Handle to a property declaration, used to look up documentation tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

bitflags! {
    /// Type-category flags, mirroring a checker's `TypeFlags`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeFlags: u32 {
        const ANY = 1 << 0;
        const UNKNOWN = 1 << 1;
        const NEVER = 1 << 2;
        const VOID = 1 << 3;
        const UNDEFINED = 1 << 4;
        const NULL = 1 << 5;
        const STRING = 1 << 6;
        const NUMBER = 1 << 7;
        const BOOLEAN = 1 << 8;
        const BIGINT = 1 << 9;
        const ES_SYMBOL = 1 << 10;
        const UNIQUE_SYMBOL = 1 << 11;
        const STRING_LITERAL = 1 << 12;
        const NUMBER_LITERAL = 1 << 13;
        const BOOLEAN_LITERAL = 1 << 14;
        const BIGINT_LITERAL = 1 << 15;
        const ENUM_LITERAL = 1 << 16;
        const TEMPLATE_LITERAL = 1 << 17;
        const OBJECT = 1 << 18;
        const NON_PRIMITIVE = 1 << 19;
        const UNION = 1 << 20;
        const INTERSECTION = 1 << 21;
        const TYPE_PARAMETER = 1 << 22;
        const CONDITIONAL = 1 << 23;
        const INDEXED_ACCESS = 1 << 24;

        const LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::BOOLEAN_LITERAL.bits()
            | Self::BIGINT_LITERAL.bits();
        /// Literals that the union fast path converts without a recursive walk.
        const SCALAR_LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::BIGINT_LITERAL.bits();
        const DEFERRED = Self::TYPE_PARAMETER.bits()
            | Self::CONDITIONAL.bits()
            | Self::INDEXED_ACCESS.bits();
    }
}

/// Declared alias of a type, with the arguments it was instantiated with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AliasInfo {
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<TypeId>,
}

/// One own property of an object type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub type_id: TypeId,
    #[serde(default)]
    pub optional: bool,
    /// Declared optional without admitting an explicit `undefined`.
    #[serde(default)]
    pub exact_optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub is_method: bool,
    #[serde(default)]
    pub declaration: Option<DeclId>,
}

impl PropertyInfo {
    pub fn required(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            optional: false,
            exact_optional: false,
            readonly: false,
            is_method: false,
            declaration: None,
        }
    }

    pub fn optional(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            optional: true,
            ..Self::required(name, type_id)
        }
    }

    pub fn method(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            is_method: true,
            ..Self::required(name, type_id)
        }
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn exact(mut self) -> Self {
        self.exact_optional = true;
        self
    }

    pub fn with_declaration(mut self, decl: DeclId) -> Self {
        self.declaration = Some(decl);
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleElementInfo {
    pub type_id: TypeId,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

impl TupleElementInfo {
    pub fn required(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: false,
            rest: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSignatureInfo {
    pub key_type: TypeId,
    pub value_type: TypeId,
}

/// Text segments and interleaved slot types of a template literal type.
///
/// `texts.len() == slots.len() + 1`: `` `a${T}b${U}c` `` has texts
/// `["a", "b", "c"]` and slots `[T, U]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteralInfo {
    pub texts: Vec<String>,
    pub slots: Vec<TypeId>,
}

/// Where a value declaration lives (used for validator functions).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSource {
    pub name: String,
    pub module_path: String,
}

/// One documentation tag attached to a declaration (`@minLength 3`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTag {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl DocTag {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
