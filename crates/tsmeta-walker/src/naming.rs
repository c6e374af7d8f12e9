//! Declared names and composite names for generic instantiations.
//!
//! Two instantiations of one generic declaration must not share a registry
//! entry, so `Page<User>` registers as `PageUser` and `Page<Order>` as
//! `PageOrder`. Every type argument has to render to a stable token; when one
//! does not, the caller inlines the instantiation instead of inventing a
//! collision-prone name.

use convert_case::{Case, Casing};
use tsmeta_common::LiteralValue;
use tsmeta_common::limits::SMALL_LITERAL_UNION_TOKEN_LIMIT;
use tsmeta_oracle::{TypeFlags, TypeId, TypeOracle};

/// Nesting limit for argument tokens (`Page<Box<Page<User>>>`).
const MAX_TOKEN_NESTING: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NameResolution {
    Named(String),
    /// No declared name at all.
    Anonymous,
    /// A declared generic (the payload is its base name) whose type arguments
    /// cannot be rendered, or whose composite name is already taken by a
    /// different instantiation.
    Unnameable(String),
}

/// Checker placeholder names given to anonymous shapes (`__type`, `__object`).
pub(crate) fn is_placeholder(name: &str) -> bool {
    name.is_empty() || name.starts_with("__")
}

/// Own symbol name, else alias name, ignoring placeholders.
pub(crate) fn declared_name(oracle: &dyn TypeOracle, ty: TypeId) -> Option<String> {
    oracle
        .symbol_name(ty)
        .filter(|name| !is_placeholder(name))
        .or_else(|| {
            oracle
                .alias(ty)
                .map(|alias| alias.name)
                .filter(|name| !is_placeholder(name))
        })
}

/// A composite name together with the argument structure it was built from.
///
/// Names are plain token concatenations and can coincide for different
/// argument lists (`Pair<A, BC>` and `Pair<AB, C>` both give `PairABC`); the
/// signature keeps the argument boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompositeName {
    pub name: String,
    pub signature: String,
}

/// `base` followed by one token per argument, or `None` if any argument
/// cannot be rendered.
pub(crate) fn composite_name(
    oracle: &dyn TypeOracle,
    base: &str,
    args: &[TypeId],
) -> Option<CompositeName> {
    nested_name(oracle, base, args, 0)
}

fn argument_token(oracle: &dyn TypeOracle, ty: TypeId, nesting: u32) -> Option<CompositeName> {
    if nesting > MAX_TOKEN_NESTING {
        return None;
    }
    let flags = oracle.flags(ty);

    if let Some(token) = primitive_token(flags) {
        return Some(CompositeName {
            name: token.to_string(),
            signature: token.to_lowercase(),
        });
    }
    if flags.intersects(TypeFlags::LITERAL) {
        let value = oracle.literal_value(ty)?;
        return Some(CompositeName {
            name: literal_token(&value)?,
            signature: value.to_string(),
        });
    }
    if oracle.is_array_type(ty) {
        let element = argument_token(oracle, oracle.array_element_type(ty)?, nesting + 1)?;
        return Some(CompositeName {
            name: format!("{}Array", element.name),
            signature: format!("{}[]", element.signature),
        });
    }
    if oracle.is_tuple_type(ty) {
        return None;
    }

    if let Some(alias) = oracle.alias(ty) {
        if !is_placeholder(&alias.name) {
            return nested_name(oracle, &alias.name, &alias.type_arguments, nesting);
        }
    }
    if flags.contains(TypeFlags::UNION) {
        if let Some(symbol) = oracle.symbol_name(ty).filter(|s| !is_placeholder(s)) {
            return Some(CompositeName {
                signature: symbol.clone(),
                name: symbol,
            });
        }
        return literal_union_token(oracle, ty);
    }
    let symbol = oracle.symbol_name(ty).filter(|s| !is_placeholder(s))?;
    let args = oracle.type_arguments(ty);
    nested_name(oracle, &symbol, &args, nesting)
}

fn nested_name(
    oracle: &dyn TypeOracle,
    base: &str,
    args: &[TypeId],
    nesting: u32,
) -> Option<CompositeName> {
    let mut name = base.to_string();
    let mut signatures = Vec::with_capacity(args.len());
    for &arg in args {
        let token = argument_token(oracle, arg, nesting + 1)?;
        name.push_str(&token.name);
        signatures.push(token.signature);
    }
    let signature = if signatures.is_empty() {
        base.to_string()
    } else {
        format!("{base}<{}>", signatures.join(", "))
    };
    Some(CompositeName { name, signature })
}

fn primitive_token(flags: TypeFlags) -> Option<&'static str> {
    let token = if flags.contains(TypeFlags::BOOLEAN) {
        "Boolean"
    } else if flags.contains(TypeFlags::STRING) {
        "String"
    } else if flags.contains(TypeFlags::NUMBER) {
        "Number"
    } else if flags.contains(TypeFlags::BIGINT) {
        "Bigint"
    } else if flags.contains(TypeFlags::ES_SYMBOL) {
        "Symbol"
    } else if flags.contains(TypeFlags::NULL) {
        "Null"
    } else if flags.contains(TypeFlags::UNDEFINED) {
        "Undefined"
    } else if flags.contains(TypeFlags::ANY) {
        "Any"
    } else if flags.contains(TypeFlags::UNKNOWN) {
        "Unknown"
    } else if flags.contains(TypeFlags::NEVER) {
        "Never"
    } else if flags.contains(TypeFlags::VOID) {
        "Void"
    } else {
        return None;
    };
    Some(token)
}

/// Up to four literal members rendered back to back (`"a" | "b"` is `AB`).
fn literal_union_token(oracle: &dyn TypeOracle, ty: TypeId) -> Option<CompositeName> {
    let members = oracle.union_members(ty);
    if members.is_empty() || members.len() > SMALL_LITERAL_UNION_TOKEN_LIMIT {
        return None;
    }
    let mut name = String::new();
    let mut signatures = Vec::with_capacity(members.len());
    for member in members {
        if !oracle.flags(member).intersects(TypeFlags::LITERAL) {
            return None;
        }
        let value = oracle.literal_value(member)?;
        name.push_str(&literal_token(&value)?);
        signatures.push(value.to_string());
    }
    Some(CompositeName {
        name,
        signature: format!("({})", signatures.join(" | ")),
    })
}

/// Token for a literal type argument.
///
/// Distinct literals never share a token:
/// - strings start with an uppercase letter and are alphanumeric
/// - numbers start with a digit or `Minus_` and never end in `n`
/// - bigints end in `n`
/// - booleans are `True` and `False`, which no string maps to
///
/// A literal that cannot be rendered this way has no token.
pub(crate) fn literal_token(value: &LiteralValue) -> Option<String> {
    match value {
        LiteralValue::Boolean(true) => Some("True".to_string()),
        LiteralValue::Boolean(false) => Some("False".to_string()),
        LiteralValue::Number(_) => signed_digits(&value.to_key()),
        LiteralValue::Bigint(text) => signed_digits(text).map(|digits| digits + "n"),
        LiteralValue::String(text) => string_token(text),
    }
}

/// Pascal-cased string, accepted only when the literal is exactly the
/// camelCase spelling of that token. `"inProgress"` is `InProgress`;
/// `"in-progress"`, `"In Progress"` and `"IN_PROGRESS"` have no token.
fn string_token(text: &str) -> Option<String> {
    let token = text.to_case(Case::Pascal);
    let renderable = token.starts_with(|c: char| c.is_ascii_uppercase())
        && token.chars().all(|c| c.is_ascii_alphanumeric())
        && token != "True"
        && token != "False";
    (renderable && token.to_case(Case::Camel) == text).then_some(token)
}

/// `42` is `42`, `1.5` is `1_5`, `-1.5` is `Minus_1_5`. `NaN`, infinities
/// and exponent forms have no token.
fn signed_digits(text: &str) -> Option<String> {
    let (mut token, magnitude) = match text.strip_prefix('-') {
        Some(rest) => ("Minus_".to_string(), rest),
        None => (String::new(), text),
    };
    if !magnitude.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    for c in magnitude.chars() {
        match c {
            '0'..='9' => token.push(c),
            '.' => token.push('_'),
            _ => return None,
        }
    }
    Some(token)
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod tests;
