//! Tracing subscriber setup for debugging walks.
//!
//! Supports three output formats controlled by `TSMETA_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, which follows
//!   the nesting of `walk_named` and discriminant spans
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! TSMETA_LOG=debug TSMETA_LOG_FORMAT=tree my-codegen
//! TSMETA_LOG="tsmeta_walker=trace" TSMETA_LOG_FORMAT=json my-codegen
//! ```
//!
//! The subscriber is only installed when `TSMETA_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "TSMETA_LOG";
const FORMAT_VAR: &str = "TSMETA_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

/// `TSMETA_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_VAR) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Does nothing when neither variable is set, or when a subscriber is
/// already installed.
pub fn init_tracing() {
    if std::env::var(LOG_VAR).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default()
                .with(filter)
                .with(tree_layer)
                .try_init()
                .map_err(|err| err.to_string())
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .map_err(|err| err.to_string())
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err.to_string()),
    };
    if let Err(err) = installed {
        tracing::debug!(%err, "tracing subscriber already installed");
    }
}
