use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete scalar value carried by a literal type.
///
/// Bigints are kept as their decimal text; the walker never does arithmetic
/// on them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
    Bigint(String),
}

impl LiteralValue {
    /// Text used as a discriminant mapping key and in generated names.
    ///
    /// Whole numbers render without a fractional part (`1`, not `1.0`).
    pub fn to_key(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Bigint(text) => format!("{text}n"),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Stable identity used when interning literal types.
    pub fn intern_key(&self) -> String {
        match self {
            Self::Boolean(b) => format!("b:{b}"),
            Self::Number(n) => format!("n:{}", format_number(*n)),
            Self::String(s) => format!("s:{s}"),
            Self::Bigint(text) => format!("i:{text}"),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            other => f.write_str(&other.to_key()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
#[path = "../tests/literal_tests.rs"]
mod tests;
