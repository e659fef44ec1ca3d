#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_yaml::Value;
use serverless_plugin::config::{
    ClientConfig, Credentials, FunctionDescriptor, NodeProperties, RawNodeProperties,
    RelationshipConfig,
};
use serverless_plugin::types::NodeType;

/// Builder for `NodeProperties` to simplify test setup.
///
/// Starts from the fixture used across the test suite: provider `foobar`,
/// resource `name = "bar"`, `template = "baz"`, empty template url/path.
pub struct PropertiesBuilder {
    props: RawNodeProperties,
}

impl PropertiesBuilder {
    pub fn new() -> Self {
        let mut props = RawNodeProperties::default();
        props.client_config = ClientConfig {
            provider: Some("foobar".to_string()),
            credentials: Some(Credentials {
                key: "secret_name".to_string(),
                secret: "super_secret".to_string(),
            }),
        };
        props.resource_config.name = Some("bar".to_string());
        props.resource_config.template = Some("baz".to_string());
        props.resource_config.template_url = Some(String::new());
        props.resource_config.template_path = Some(String::new());
        Self { props }
    }

    /// A binary provider node downloading from `source`.
    pub fn binary(source: &str) -> Self {
        let mut props = RawNodeProperties::default();
        props.node_type = NodeType::Binary;
        props.serverless_config.executable_path = Some(String::new());
        props.installation_source = Some(source.to_string());
        Self { props }
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.props.client_config.provider = Some(provider.to_string());
        self
    }

    pub fn executable_path(mut self, path: &str) -> Self {
        self.props.serverless_config.executable_path = Some(path.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.props
            .serverless_config
            .env
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn resource_path(mut self, path: &str) -> Self {
        self.props.resource_config.path = Some(path.to_string());
        self
    }

    pub fn resource_extra(mut self, key: &str, value: &str) -> Self {
        self.props
            .resource_config
            .extra
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn function(mut self, function: FunctionDescriptor) -> Self {
        self.props.resource_config.functions.push(function);
        self
    }

    pub fn related_to(mut self, target: &str) -> Self {
        self.props.relationships.push(RelationshipConfig {
            target: target.to_string(),
        });
        self
    }

    pub fn raw(self) -> RawNodeProperties {
        self.props
    }

    pub fn build(self) -> NodeProperties {
        NodeProperties::try_from(self.props).expect("Failed to build valid properties from builder")
    }
}

impl Default for PropertiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `FunctionDescriptor`.
pub struct FunctionBuilder {
    function: FunctionDescriptor,
}

impl FunctionBuilder {
    pub fn new(name: &str, handler: &str) -> Self {
        Self {
            function: FunctionDescriptor {
                name: name.to_string(),
                handler: handler.to_string(),
                events: None,
                environment: None,
                path: None,
                extra: BTreeMap::new(),
            },
        }
    }

    /// The `qux` function from the shared fixture.
    pub fn qux() -> Self {
        Self::new("qux", "quux").event("bongo").env("taco", "bell")
    }

    pub fn event(mut self, event: &str) -> Self {
        self.function
            .events
            .get_or_insert_with(Vec::new)
            .push(Value::String(event.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.function
            .environment
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.function.path = Some(path.to_string());
        self
    }

    pub fn build(self) -> FunctionDescriptor {
        self.function
    }
}
