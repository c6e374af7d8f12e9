use crate::budget::BudgetProfile;
use serde::{Deserialize, Deserializer};
use tsmeta_common::limits::{DEFAULT_BRAND_PREFIX, DEFAULT_COMPAT_TAG_PROPERTY};

/// Accepts `true` as well as `"true"` for boolean options, the way
/// hand-edited JSON configuration files tend to spell them.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Which member wins when flattened intersection members share a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergePolicy {
    /// The property of the later member replaces the earlier one in place.
    #[default]
    LaterWins,
    FirstWins,
}

/// Explicit overrides of the profile's limits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkLimits {
    #[serde(default)]
    pub profile: BudgetProfile,
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub max_breadth: Option<u32>,
}

impl WalkLimits {
    pub fn max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(self.profile.max_depth())
    }

    pub fn max_breadth(&self) -> u32 {
        self.max_breadth.unwrap_or(self.profile.max_breadth())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkerConfig {
    #[serde(default)]
    pub limits: WalkLimits,
    /// Property-name prefix marking phantom branding properties.
    #[serde(default = "default_brand_prefix")]
    pub brand_prefix: String,
    /// Property carrying a `{ kind, value }` constraint tag.
    #[serde(default = "default_compat_tag_property")]
    pub compat_tag_property: String,
    #[serde(default)]
    pub merge_policy: MergePolicy,
    /// Register named unions and intersections met below the top level.
    #[serde(
        default = "default_true",
        deserialize_with = "deserialize_bool_or_string"
    )]
    pub register_subfield_aliases: bool,
    /// Additional symbol names treated as opaque native value types.
    #[serde(default)]
    pub extra_native_types: Vec<String>,
}

fn default_brand_prefix() -> String {
    DEFAULT_BRAND_PREFIX.to_string()
}

fn default_compat_tag_property() -> String {
    DEFAULT_COMPAT_TAG_PROPERTY.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            limits: WalkLimits::default(),
            brand_prefix: default_brand_prefix(),
            compat_tag_property: default_compat_tag_property(),
            merge_policy: MergePolicy::default(),
            register_subfield_aliases: true,
            extra_native_types: Vec::new(),
        }
    }
}

impl WalkerConfig {
    /// Whether `name` follows the branding convention.
    pub fn is_marker(&self, name: &str) -> bool {
        name == self.compat_tag_property
            || (!self.brand_prefix.is_empty()
                && name.len() > self.brand_prefix.len()
                && name.starts_with(&self.brand_prefix))
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
