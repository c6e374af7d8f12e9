//! Metadata IR for the tsmeta type walker.
//!
//! - `Metadata` nodes and their kinds (`metadata`)
//! - Validation constraints and the closed constraint-key table (`constraints`)
//! - The name-keyed `Registry` of finalized named nodes (`registry`)
//! - Read-only traversal helpers over node graphs (`visit`)

pub mod metadata;
pub use metadata::{
    AtomicKind, Degradation, IndexSignature, Metadata, MetadataKind, NativeMetadata,
    ObjectMetadata, Property, Strictness, TupleElement, UnionMetadata,
};

pub mod constraints;
pub use constraints::{
    ConstraintKey, Constraints, LetterCase, NumericType, Transform, ValidatorRef,
};

mod discriminant;
pub use discriminant::Discriminant;

pub mod registry;
pub use registry::{Registry, RegistryError};

pub mod visit;
pub use visit::for_each_ref;

pub use tsmeta_common::LiteralValue;
