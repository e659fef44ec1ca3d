// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{NodeProperties, RawNodeProperties};
use crate::errors::{PluginError, Result};
use crate::types::{NodeType, Provider};

impl TryFrom<RawNodeProperties> for NodeProperties {
    type Error = crate::errors::PluginError;

    fn try_from(raw: RawNodeProperties) -> std::result::Result<Self, Self::Error> {
        validate_raw_properties(&raw)?;
        Ok(NodeProperties::new_unchecked(raw))
    }
}

fn validate_raw_properties(raw: &RawNodeProperties) -> Result<()> {
    validate_provider(raw.client_config.provider.as_deref())?;
    validate_functions(&raw.resource_config.functions)?;
    validate_relationships(raw)?;
    validate_binary_source(raw)?;
    Ok(())
}

fn validate_provider(provider: Option<&str>) -> Result<()> {
    if let Some(p) = provider {
        p.parse::<Provider>()
            .map_err(|e| PluginError::ConfigError(format!("[client_config].{e}")))?;
    }
    Ok(())
}

fn validate_functions(functions: &[crate::config::FunctionDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for function in functions {
        if function.name.trim().is_empty() {
            return Err(PluginError::ConfigError(
                "every entry in resource_config.functions needs a non-empty `name`".to_string(),
            ));
        }
        if function.handler.trim().is_empty() {
            return Err(PluginError::ConfigError(format!(
                "function '{}' has an empty `handler`",
                function.name
            )));
        }
        if !seen.insert(function.name.as_str()) {
            return Err(PluginError::ConfigError(format!(
                "function '{}' is declared more than once",
                function.name
            )));
        }
    }
    Ok(())
}

fn validate_relationships(raw: &RawNodeProperties) -> Result<()> {
    for rel in raw.relationships.iter() {
        if rel.target.trim().is_empty() {
            return Err(PluginError::ConfigError(
                "relationship `target` must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_binary_source(raw: &RawNodeProperties) -> Result<()> {
    if raw.node_type != NodeType::Binary {
        return Ok(());
    }
    let has_path = raw
        .serverless_config
        .executable_path
        .as_deref()
        .is_some_and(|p| !p.is_empty());
    let has_source = raw
        .installation_source
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    if !has_path && !has_source {
        return Err(PluginError::ConfigError(
            "binary nodes need either serverless_config.executable_path or installation_source"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::FunctionDescriptor;

    fn function(name: &str, handler: &str) -> FunctionDescriptor {
        FunctionDescriptor {
            name: name.to_string(),
            handler: handler.to_string(),
            events: None,
            environment: None,
            path: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn duplicate_function_names_are_rejected() {
        let mut raw = RawNodeProperties::default();
        raw.resource_config.functions = vec![function("qux", "a"), function("qux", "b")];

        match NodeProperties::try_from(raw) {
            Err(PluginError::ConfigError(msg)) => assert!(msg.contains("more than once")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn binary_without_source_or_path_is_rejected() {
        let raw = RawNodeProperties {
            node_type: NodeType::Binary,
            ..Default::default()
        };
        assert!(matches!(
            NodeProperties::try_from(raw),
            Err(PluginError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_provider_is_rejected() {
        let mut raw = RawNodeProperties::default();
        raw.client_config.provider = Some(String::new());
        assert!(NodeProperties::try_from(raw).is_err());
    }
}
