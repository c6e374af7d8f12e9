//! Loading `WalkerConfig` from JSON files.
//!
//! Configuration files may contain comments and trailing commas, like
//! `tsconfig.json`:
//!
//! ```jsonc
//! {
//!   // fail fast on huge graphs
//!   "limits": { "profile": "shallow" },
//!   "brandPrefix": "__",
//!   "mergePolicy": "firstWins",
//! }
//! ```

use anyhow::{Context, Result, bail};
use std::path::Path;
use tsmeta_walker::WalkerConfig;

pub fn parse_config(source: &str) -> Result<WalkerConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let config: WalkerConfig =
        serde_json::from_str(&normalized).context("failed to parse walker config JSON")?;
    validate(&config)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<WalkerConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read walker config: {}", path.display()))?;
    parse_config(&source)
        .with_context(|| format!("failed to parse walker config: {}", path.display()))
}

fn validate(config: &WalkerConfig) -> Result<()> {
    if config.brand_prefix.is_empty() {
        bail!("brandPrefix must not be empty");
    }
    if config.limits.max_depth() == 0 {
        bail!("limits.maxDepth must be at least 1");
    }
    Ok(())
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                chars.next();
                in_line_comment = true;
            }
            ('/', Some('*')) => {
                chars.next();
                in_block_comment = true;
            }
            _ => out.push(ch),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars.clone().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
