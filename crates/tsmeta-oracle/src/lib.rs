//! Type Oracle boundary for the metadata walker.
//!
//! The walker never owns a type checker. It asks structural questions about
//! opaque [`TypeId`] handles through the [`TypeOracle`] capability trait and
//! asks for documentation tags through [`DocTagSource`]. Both are read-only.
//!
//! [`TypeTable`] is an in-memory implementation of both traits: a builder for
//! synthetic type graphs (tests, fixtures) that can also be loaded from a JSON
//! snapshot exported by a real checker.

pub mod types;
pub use types::{
    AliasInfo, DeclId, DeclarationSource, DocTag, IndexSignatureInfo, PropertyInfo,
    TemplateLiteralInfo, TupleElementInfo, TypeFlags, TypeId,
};

mod oracle;
pub use oracle::{DocTagSource, NoDocTags, TypeOracle};

pub mod table;
pub use table::{TableError, TypeTable};

pub use tsmeta_common::LiteralValue;
