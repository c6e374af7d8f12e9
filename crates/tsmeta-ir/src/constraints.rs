//! Validation constraints attachable to nodes and properties.
//!
//! Constraints arrive from three places (phantom marker properties, the
//! `{ kind, value }` compatibility tag, documentation tags) and all of them
//! go through the same closed [`ConstraintKey`] table. A key name that is not
//! in the table is ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tsmeta_common::LiteralValue;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    // =========================================================================
    // Numeric
    // =========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_type: Option<NumericType>,

    // =========================================================================
    // String
    // =========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<LetterCase>,

    // =========================================================================
    // Array
    // =========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    // =========================================================================
    // Behavior
    // =========================================================================
    /// Applied in order before validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coerce: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Per-key messages, keyed by the constraint key name (`minLength`).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub error_messages: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorRef>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericType {
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
}

impl NumericType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int32" | "int" | "integer" => Some(Self::Int32),
            "uint32" => Some(Self::Uint32),
            "int64" => Some(Self::Int64),
            "uint64" => Some(Self::Uint64),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterCase {
    Lower,
    Upper,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transform {
    Trim,
    ToLowerCase,
    ToUpperCase,
}

/// External validation function referenced by `validate` markers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorRef {
    pub function_name: String,
    pub module_path: String,
}

macro_rules! fill_missing {
    ($target:ident, $base:ident; $($field:ident),* $(,)?) => {
        $(
            if $target.$field.is_none() {
                $target.$field = $base.$field.clone();
            }
        )*
    };
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `base` underneath `self`: every field `self` sets wins.
    pub fn merge_over(mut self, base: &Constraints) -> Constraints {
        fill_missing!(self, base;
            minimum, maximum, exclusive_minimum, exclusive_maximum, multiple_of, numeric_type,
            min_length, max_length, pattern, format, starts_with, ends_with, includes, case,
            min_items, max_items, unique_items, default, coerce, error_message, validator,
        );
        if self.transforms.is_empty() {
            self.transforms = base.transforms.clone();
        }
        let mut messages = base.error_messages.clone();
        for (key, message) in std::mem::take(&mut self.error_messages) {
            messages.insert(key, message);
        }
        self.error_messages = messages;
        self
    }

    fn push_transform(&mut self, transform: Transform) {
        if !self.transforms.contains(&transform) {
            self.transforms.push(transform);
        }
    }
}

/// Shape of the value a key expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ValueKind {
    Number,
    Count,
    Text,
    Flag,
    Json,
}

/// The closed set of constraint keys understood by every source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKey {
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    NumericType,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    StartsWith,
    EndsWith,
    Includes,
    Lowercase,
    Uppercase,
    MinItems,
    MaxItems,
    UniqueItems,
    Trim,
    ToLowerCase,
    ToUpperCase,
    Default,
    Coerce,
}

impl ConstraintKey {
    pub const ALL: [Self; 23] = [
        Self::Minimum,
        Self::Maximum,
        Self::ExclusiveMinimum,
        Self::ExclusiveMaximum,
        Self::MultipleOf,
        Self::NumericType,
        Self::MinLength,
        Self::MaxLength,
        Self::Pattern,
        Self::Format,
        Self::StartsWith,
        Self::EndsWith,
        Self::Includes,
        Self::Lowercase,
        Self::Uppercase,
        Self::MinItems,
        Self::MaxItems,
        Self::UniqueItems,
        Self::Trim,
        Self::ToLowerCase,
        Self::ToUpperCase,
        Self::Default,
        Self::Coerce,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMinimum => "exclusiveMinimum",
            Self::ExclusiveMaximum => "exclusiveMaximum",
            Self::MultipleOf => "multipleOf",
            Self::NumericType => "type",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Includes => "includes",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::UniqueItems => "uniqueItems",
            Self::Trim => "trim",
            Self::ToLowerCase => "toLowerCase",
            Self::ToUpperCase => "toUpperCase",
            Self::Default => "default",
            Self::Coerce => "coerce",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Transform keys have no failure mode, so they take no error message.
    pub const fn is_transform(self) -> bool {
        matches!(self, Self::Trim | Self::ToLowerCase | Self::ToUpperCase)
    }

    const fn value_kind(self) -> ValueKind {
        match self {
            Self::Minimum
            | Self::Maximum
            | Self::ExclusiveMinimum
            | Self::ExclusiveMaximum
            | Self::MultipleOf => ValueKind::Number,
            Self::MinLength | Self::MaxLength | Self::MinItems | Self::MaxItems => ValueKind::Count,
            Self::NumericType
            | Self::Pattern
            | Self::Format
            | Self::StartsWith
            | Self::EndsWith
            | Self::Includes => ValueKind::Text,
            Self::Lowercase
            | Self::Uppercase
            | Self::UniqueItems
            | Self::Trim
            | Self::ToLowerCase
            | Self::ToUpperCase
            | Self::Coerce => ValueKind::Flag,
            Self::Default => ValueKind::Json,
        }
    }

    /// Apply a literal-typed value. Returns `false` when the value does not
    /// fit the key and nothing was set.
    pub fn apply(self, target: &mut Constraints, value: &LiteralValue) -> bool {
        match (self.value_kind(), value) {
            (ValueKind::Number, LiteralValue::Number(n)) => self.set_number(target, *n),
            (ValueKind::Count, LiteralValue::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => {
                self.set_count(target, *n as u64)
            }
            (ValueKind::Text, LiteralValue::String(s)) => self.set_text(target, s),
            (ValueKind::Flag, LiteralValue::Boolean(b)) => self.set_flag(target, *b),
            (ValueKind::Json, value) => {
                target.default = Some(literal_to_json(value));
                true
            }
            _ => false,
        }
    }

    /// Apply a value written as documentation text (`@minLength 3`).
    pub fn apply_text(self, target: &mut Constraints, text: &str) -> bool {
        let text = text.trim();
        match self.value_kind() {
            ValueKind::Number => text
                .parse::<f64>()
                .is_ok_and(|n| self.set_number(target, n)),
            ValueKind::Count => text
                .parse::<u64>()
                .is_ok_and(|n| self.set_count(target, n)),
            ValueKind::Text => !text.is_empty() && self.set_text(target, text),
            ValueKind::Flag => match text {
                "" | "true" => self.set_flag(target, true),
                "false" => self.set_flag(target, false),
                _ => false,
            },
            ValueKind::Json => {
                let value = serde_json::from_str(text)
                    .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));
                target.default = Some(value);
                true
            }
        }
    }

    /// Record the message reported when this key fails. Inert on transforms.
    pub fn set_error_message(self, target: &mut Constraints, message: &str) -> bool {
        if self.is_transform() {
            return false;
        }
        target
            .error_messages
            .insert(self.name().to_string(), message.to_string());
        true
    }

    fn set_number(self, target: &mut Constraints, n: f64) -> bool {
        let slot = match self {
            Self::Minimum => &mut target.minimum,
            Self::Maximum => &mut target.maximum,
            Self::ExclusiveMinimum => &mut target.exclusive_minimum,
            Self::ExclusiveMaximum => &mut target.exclusive_maximum,
            Self::MultipleOf => &mut target.multiple_of,
            _ => return false,
        };
        *slot = Some(n);
        true
    }

    fn set_count(self, target: &mut Constraints, n: u64) -> bool {
        let slot = match self {
            Self::MinLength => &mut target.min_length,
            Self::MaxLength => &mut target.max_length,
            Self::MinItems => &mut target.min_items,
            Self::MaxItems => &mut target.max_items,
            _ => return false,
        };
        *slot = Some(n);
        true
    }

    fn set_text(self, target: &mut Constraints, text: &str) -> bool {
        let slot = match self {
            Self::NumericType => {
                return match NumericType::from_name(text) {
                    Some(numeric) => {
                        target.numeric_type = Some(numeric);
                        true
                    }
                    None => false,
                };
            }
            Self::Pattern => &mut target.pattern,
            Self::Format => &mut target.format,
            Self::StartsWith => &mut target.starts_with,
            Self::EndsWith => &mut target.ends_with,
            Self::Includes => &mut target.includes,
            _ => return false,
        };
        *slot = Some(text.to_string());
        true
    }

    fn set_flag(self, target: &mut Constraints, on: bool) -> bool {
        match self {
            Self::UniqueItems => target.unique_items = Some(on),
            Self::Coerce => target.coerce = Some(on),
            Self::Lowercase if on => target.case = Some(LetterCase::Lower),
            Self::Uppercase if on => target.case = Some(LetterCase::Upper),
            Self::Trim if on => target.push_transform(Transform::Trim),
            Self::ToLowerCase if on => target.push_transform(Transform::ToLowerCase),
            Self::ToUpperCase if on => target.push_transform(Transform::ToUpperCase),
            _ => return false,
        }
        true
    }
}

fn literal_to_json(value: &LiteralValue) -> serde_json::Value {
    match value {
        LiteralValue::Boolean(b) => serde_json::Value::Bool(*b),
        LiteralValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        LiteralValue::String(s) | LiteralValue::Bigint(s) => serde_json::Value::String(s.clone()),
    }
}

#[cfg(test)]
#[path = "../tests/constraints_tests.rs"]
mod tests;
