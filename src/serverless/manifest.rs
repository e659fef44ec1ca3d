// src/serverless/manifest.rs

//! Merging declared functions into `serverless.yml`.

use std::path::Path;

use serde_yaml::{Mapping, Sequence, Value};

use crate::config::FunctionDescriptor;
use crate::errors::{PluginError, Result};
use crate::fs::FileSystem;

pub const MANIFEST_FILE: &str = "serverless.yml";

/// Manifest entry for one function: `{<name>: {handler, events, environment, ...}}`.
///
/// `name` becomes the key and `path` is dropped; everything else is kept.
pub fn function_entry(function: &FunctionDescriptor) -> Value {
    let mut body = Mapping::new();
    body.insert("handler".into(), Value::String(function.handler.clone()));
    if let Some(events) = &function.events {
        body.insert("events".into(), Value::Sequence(events.clone()));
    }
    if let Some(environment) = &function.environment {
        let env: Mapping = environment
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.clone()))
            .collect();
        body.insert("environment".into(), Value::Mapping(env));
    }
    for (key, value) in function.extra.iter() {
        body.insert(Value::String(key.clone()), value.clone());
    }

    let mut entry = Mapping::new();
    entry.insert(Value::String(function.name.clone()), Value::Mapping(body));
    Value::Mapping(entry)
}

/// Replace the top-level `functions` key of `manifest`, leaving every other
/// key as it was.
pub fn merge_functions(manifest: &str, functions: &[FunctionDescriptor]) -> Result<String> {
    let mut doc: Value = serde_yaml::from_str(manifest)?;
    if doc.is_null() {
        doc = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(root) = &mut doc else {
        return Err(PluginError::ConfigError(format!(
            "{MANIFEST_FILE} must contain a mapping at the top level"
        )));
    };

    let entries: Sequence = functions.iter().map(function_entry).collect();
    root.insert("functions".into(), Value::Sequence(entries));

    Ok(serde_yaml::to_string(&doc)?)
}

/// Rewrite the manifest at `path` in place.
pub fn update_manifest_file(
    fs: &dyn FileSystem,
    path: &Path,
    functions: &[FunctionDescriptor],
) -> Result<()> {
    if !fs.is_file(path) {
        return Err(PluginError::ConfigError(format!(
            "{} not found; run create first",
            path.display()
        )));
    }
    let contents = fs.read_to_string(path)?;
    let updated = merge_functions(&contents, functions)?;
    fs.write(path, updated.as_bytes())?;
    Ok(())
}
