//! Template literal types as anchored string patterns.
//!
//! `` `order-${number}` `` becomes `^order\-[+-]?\d+(?:\.\d+)?$`.

use crate::walker::TypeWalker;
use tsmeta_ir::{AtomicKind, Constraints, Metadata};
use tsmeta_oracle::{TemplateLiteralInfo, TypeFlags, TypeId, TypeOracle};

const NUMERIC_SLOT: &str = r"[+-]?\d+(?:\.\d+)?";
const ANY_SLOT: &str = ".*";

impl<'a> TypeWalker<'a> {
    pub(crate) fn template_literal(&mut self, ty: TypeId) -> Metadata {
        let node = Metadata::atomic(AtomicKind::String);
        let Some(info) = self.oracle.template_literal(ty) else {
            return node;
        };
        let constraints = Constraints {
            pattern: Some(template_pattern(self.oracle, &info)),
            ..Constraints::default()
        };
        node.with_constraints(Some(Box::new(constraints)))
    }
}

/// Text segments are escaped; slots interleave with them.
pub(crate) fn template_pattern(oracle: &dyn TypeOracle, info: &TemplateLiteralInfo) -> String {
    let mut pattern = String::from("^");
    for (index, text) in info.texts.iter().enumerate() {
        pattern.push_str(&regex::escape(text));
        if let Some(&slot) = info.slots.get(index) {
            pattern.push_str(slot_pattern(oracle.flags(slot)));
        }
    }
    for &slot in info.slots.iter().skip(info.texts.len()) {
        pattern.push_str(slot_pattern(oracle.flags(slot)));
    }
    pattern.push('$');
    pattern
}

fn slot_pattern(flags: TypeFlags) -> &'static str {
    if flags.intersects(
        TypeFlags::NUMBER
            | TypeFlags::BIGINT
            | TypeFlags::NUMBER_LITERAL
            | TypeFlags::BIGINT_LITERAL,
    ) {
        NUMERIC_SLOT
    } else {
        ANY_SLOT
    }
}
