//! Name-keyed store of finalized named metadata nodes.

use crate::metadata::Metadata;
use crate::visit::for_each_ref;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateRegistration(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRegistration(name) => {
                write!(f, "'{name}' is already registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Every named node produced during one analysis run.
///
/// A name is registered at most once. Iteration follows registration order;
/// [`Registry::names`] and serialization are sorted, so two runs that
/// register the same set in a different order compare and serialize equal.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: IndexMap<String, Metadata>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Register `node` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register(&mut self, name: impl Into<String>, node: Metadata) {
        if let Err(err) = self.try_register(name, node) {
            panic!("{err}");
        }
    }

    pub fn try_register(
        &mut self,
        name: impl Into<String>,
        node: Metadata,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateRegistration(name));
        }
        self.entries.insert(name, node);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&Metadata> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metadata)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Names referenced by a registered node that are not registered.
    pub fn dangling_refs(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for node in self.entries.values() {
            for_each_ref(node, &mut |name| {
                if !self.has(name) && !missing.iter().any(|m: &String| m == name) {
                    missing.push(name.to_string());
                }
            });
        }
        missing.sort_unstable();
        missing
    }
}

impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(name, node)| other.resolve(name) == Some(node))
    }
}

impl Serialize for Registry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for name in self.names() {
            if let Some(node) = self.entries.get(name) {
                map.serialize_entry(name, node)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Registry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, Metadata>::deserialize(deserializer)?;
        Ok(Self { entries })
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
