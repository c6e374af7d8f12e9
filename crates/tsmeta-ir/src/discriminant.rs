use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property whose literal value tells the members of a union apart.
///
/// `mapping` keys are the literal values rendered with
/// [`LiteralValue::to_key`](tsmeta_common::LiteralValue::to_key), in member
/// order; values are member indices. If two values of different kinds render
/// to the same key (`"1"` and `1`), all keys use the `Display` form instead,
/// which quotes strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminant {
    pub property_name: String,
    pub mapping: IndexMap<String, usize>,
}

impl Discriminant {
    pub fn member_for(&self, key: &str) -> Option<usize> {
        self.mapping.get(key).copied()
    }
}
