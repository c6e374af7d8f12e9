use serde::Serialize;

/// How seriously a caller should treat a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    /// Information was dropped on purpose (e.g. an inlined generic instantiation).
    Advisory,
    /// Part of the graph was summarized as `any` or dropped.
    Warning,
}

/// Stable code per kind of degraded outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    UnnameableTypeArguments,
    DepthExceeded,
    BreadthExceeded,
    DuplicateRegistration,
}

impl DiagnosticCode {
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::UnnameableTypeArguments => 9001,
            Self::DepthExceeded => 9002,
            Self::BreadthExceeded => 9003,
            Self::DuplicateRegistration => 9004,
        }
    }

    pub const fn category(self) -> DiagnosticCategory {
        match self {
            Self::UnnameableTypeArguments => DiagnosticCategory::Advisory,
            Self::DepthExceeded | Self::BreadthExceeded | Self::DuplicateRegistration => {
                DiagnosticCategory::Warning
            }
        }
    }

    /// Message template; `{0}`, `{1}` are substituted by [`format_message`].
    pub const fn template(self) -> &'static str {
        match self {
            Self::UnnameableTypeArguments => {
                "Type arguments of '{0}' cannot be named; instantiations are inlined at each use."
            }
            Self::DepthExceeded => {
                "Type nesting deeper than {0} levels under '{1}' was summarized as 'any'."
            }
            Self::BreadthExceeded => {
                "More than {0} types reachable from '{1}'; the remainder was summarized as 'any'."
            }
            Self::DuplicateRegistration => {
                "'{0}' was registered twice; the later definition was dropped."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, args: &[&str]) -> Self {
        Self {
            category: code.category(),
            code: code.as_u32(),
            message: format_message(code.template(), args),
        }
    }

    pub fn is_advisory(&self) -> bool {
        self.category == DiagnosticCategory::Advisory
    }
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
