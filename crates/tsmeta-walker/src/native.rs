//! Well-known library types that are not converted structurally.

/// Marker name for function-shaped types without data properties.
pub(crate) const FUNCTION: &str = "Function";

/// Opaque runtime value types.
const VALUE_TYPES: &[&str] = &[
    "Date",
    "RegExp",
    "URL",
    "URLSearchParams",
    "ArrayBuffer",
    "SharedArrayBuffer",
    "DataView",
    "Buffer",
    "Blob",
    "File",
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
    "BigInt64Array",
    "BigUint64Array",
    "Error",
    "TypeError",
    "RangeError",
    "SyntaxError",
    "ReferenceError",
    "EvalError",
    "URIError",
    "AggregateError",
];

/// Generic containers whose type arguments are kept in order.
const CONTAINERS: &[&str] = &[
    "Map",
    "Set",
    "ReadonlyMap",
    "ReadonlySet",
    "WeakMap",
    "WeakSet",
];

/// Asynchronous wrappers replaced by their first type argument.
const WRAPPERS: &[&str] = &[
    "Promise",
    "PromiseLike",
    "Observable",
    "AsyncGenerator",
    "AsyncIterable",
    "AsyncIterableIterator",
    "AsyncIterator",
];

pub(crate) fn is_value_type(symbol: &str) -> bool {
    VALUE_TYPES.contains(&symbol)
}

pub(crate) fn is_container(symbol: &str) -> bool {
    CONTAINERS.contains(&symbol)
}

pub(crate) fn is_wrapper(symbol: &str) -> bool {
    WRAPPERS.contains(&symbol)
}
