use crate::types::{
    AliasInfo, DeclId, DeclarationSource, DocTag, IndexSignatureInfo, PropertyInfo,
    TemplateLiteralInfo, TupleElementInfo, TypeFlags, TypeId,
};
use tsmeta_common::LiteralValue;

/// Structural queries about opaque type handles.
///
/// Implementations wrap an existing type checker. Every method is a pure
/// read: the walker never mutates oracle state, and it tolerates partial
/// answers (an empty property list, a missing symbol) by degrading rather
/// than failing.
pub trait TypeOracle {
    /// Category flags of `ty`. Unknown handles answer with empty flags.
    fn flags(&self, ty: TypeId) -> TypeFlags;

    /// Declared name of the type's own symbol, if it has one.
    ///
    /// Anonymous shapes may answer with a checker placeholder such as
    /// `__type` or `__object`; callers filter those.
    fn symbol_name(&self, ty: TypeId) -> Option<String>;

    /// The alias the type was reached through, with its type arguments.
    fn alias(&self, ty: TypeId) -> Option<AliasInfo>;

    /// Own properties in declaration order.
    fn properties(&self, ty: TypeId) -> Vec<PropertyInfo>;

    /// Type arguments of a generic instantiation (`Page<User>` → `[User]`).
    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId>;

    fn union_members(&self, ty: TypeId) -> Vec<TypeId>;

    fn intersection_members(&self, ty: TypeId) -> Vec<TypeId>;

    /// `true` only for the built-in array types.
    fn is_array_type(&self, ty: TypeId) -> bool;

    /// Element type for built-in arrays and for named types extending one.
    fn array_element_type(&self, ty: TypeId) -> Option<TypeId>;

    fn is_tuple_type(&self, ty: TypeId) -> bool;

    fn tuple_elements(&self, ty: TypeId) -> Vec<TupleElementInfo>;

    fn call_signature_count(&self, ty: TypeId) -> usize;

    fn index_signatures(&self, ty: TypeId) -> Vec<IndexSignatureInfo>;

    fn literal_value(&self, ty: TypeId) -> Option<LiteralValue>;

    fn template_literal(&self, ty: TypeId) -> Option<TemplateLiteralInfo>;

    /// Base constraint of a type parameter, conditional or indexed access type.
    fn base_constraint(&self, ty: TypeId) -> Option<TypeId>;

    /// Declared name and module of the value behind a function type.
    fn declaration_source(&self, ty: TypeId) -> Option<DeclarationSource>;
}

/// Documentation tags for declarations, parsed by the caller's front end.
pub trait DocTagSource {
    fn property_tags(&self, decl: DeclId) -> Vec<DocTag>;

    fn type_tags(&self, ty: TypeId) -> Vec<DocTag>;
}

/// Tag source for runs without documentation comments.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDocTags;

impl DocTagSource for NoDocTags {
    fn property_tags(&self, _decl: DeclId) -> Vec<DocTag> {
        Vec::new()
    }

    fn type_tags(&self, _ty: TypeId) -> Vec<DocTag> {
        Vec::new()
    }
}
