// src/state/mod.rs

//! Persisted per-instance runtime state.
//!
//! Every managed node instance owns an [`InstanceRecord`]: its type hierarchy
//! and a string-keyed bag of runtime properties. Records are read and written
//! through a [`StateStore`]; the file-backed store keeps one TOML file per
//! instance, the memory store backs tests.

pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use store::{FileStateStore, MemoryStateStore, StateStore};

/// Runtime property holding a resolved executable path.
pub const EXECUTABLE_PATH: &str = "executable_path";
/// Runtime property holding the instance's working directory.
pub const ROOT_DIRECTORY: &str = "root_directory";
/// Captured `serverless invoke` output, keyed by function name.
pub const INVOKE_OUTPUT: &str = "invoke";
/// Captured `serverless metrics` output, keyed by function name.
pub const METRICS_OUTPUT: &str = "metrics";
/// Captured `serverless info` output.
pub const INFO_OUTPUT: &str = "info";

pub type RuntimeProperties = BTreeMap<String, toml::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,

    #[serde(default)]
    pub type_hierarchy: Vec<String>,

    #[serde(default)]
    pub runtime_properties: RuntimeProperties,
}

impl InstanceRecord {
    pub fn new(id: impl Into<String>, type_hierarchy: Vec<String>) -> Self {
        Self {
            id: id.into(),
            type_hierarchy,
            runtime_properties: RuntimeProperties::new(),
        }
    }

    /// True if `type_name` appears anywhere in this instance's hierarchy.
    pub fn is_of_type(&self, type_name: &str) -> bool {
        self.type_hierarchy.iter().any(|t| t == type_name)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.runtime_properties.get(key).and_then(|v| v.as_str())
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.runtime_properties
            .insert(key.to_string(), toml::Value::String(value.into()));
    }

    /// Store `value` under `outer.inner`, creating the table if needed.
    pub fn set_nested_str(&mut self, outer: &str, inner: &str, value: impl Into<String>) {
        let entry = self
            .runtime_properties
            .entry(outer.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if !entry.is_table() {
            *entry = toml::Value::Table(toml::Table::new());
        }
        if let toml::Value::Table(table) = entry {
            table.insert(inner.to_string(), toml::Value::String(value.into()));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.runtime_properties.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeType, BINARY_TYPE, SERVICE_TYPE};

    #[test]
    fn nested_values_replace_scalars() {
        let mut rec = InstanceRecord::new("sl", NodeType::Service.type_hierarchy());
        rec.set_str(INVOKE_OUTPUT, "stale");
        rec.set_nested_str(INVOKE_OUTPUT, "qux", "{\"ok\":true}");

        let table = rec.runtime_properties[INVOKE_OUTPUT].as_table().unwrap();
        assert_eq!(table["qux"].as_str(), Some("{\"ok\":true}"));
    }

    #[test]
    fn type_membership() {
        let rec = InstanceRecord::new("bin", NodeType::Binary.type_hierarchy());
        assert!(rec.is_of_type(BINARY_TYPE));
        assert!(!rec.is_of_type(SERVICE_TYPE));
    }
}
