// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;

use crate::types::{NodeType, Provider};

/// Node properties as read from a TOML properties file.
///
/// ```toml
/// node_type = "cloudify.nodes.serverless.Service"
///
/// [client_config]
/// provider = "aws"
/// credentials = { key = "AKIA...", secret = "..." }
///
/// [resource_config]
/// name = "my-service"
/// template = "aws-nodejs"
///
/// [[resource_config.functions]]
/// name = "hello"
/// handler = "handler.hello"
/// events = [{ http = { path = "hello", method = "get" } }]
/// environment = { STAGE = "dev" }
/// path = "handler.js"
///
/// [serverless_config]
/// executable_path = ""
///
/// [[relationships]]
/// target = "sls_binary"
/// ```
///
/// This is the unchecked form; use [`NodeProperties`] everywhere else.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawNodeProperties {
    #[serde(default)]
    pub node_type: NodeType,

    #[serde(default)]
    pub client_config: ClientConfig,

    #[serde(default)]
    pub resource_config: ResourceConfig,

    #[serde(default)]
    pub serverless_config: ServerlessConfig,

    /// Download URL of the `serverless` binary (Binary nodes only).
    #[serde(default)]
    pub installation_source: Option<String>,

    /// Links to other node instances, by instance id.
    #[serde(default)]
    pub relationships: Vec<RelationshipConfig>,
}

/// Validated node properties: the Configuration Bundle for one action.
///
/// Built from [`RawNodeProperties`] via `TryFrom` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct NodeProperties {
    pub node_type: NodeType,
    pub client_config: ClientConfig,
    pub resource_config: ResourceConfig,
    pub serverless_config: ServerlessConfig,
    pub installation_source: Option<String>,
    pub relationships: Vec<RelationshipConfig>,
}

impl NodeProperties {
    pub(crate) fn new_unchecked(raw: RawNodeProperties) -> Self {
        Self {
            node_type: raw.node_type,
            client_config: raw.client_config,
            resource_config: raw.resource_config,
            serverless_config: raw.serverless_config,
            installation_source: raw.installation_source,
            relationships: raw.relationships,
        }
    }
}

/// `[client_config]`: provider and credentials.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl ClientConfig {
    /// Parsed provider, or `None` when not configured.
    pub fn provider(&self) -> Option<Provider> {
        self.provider.as_deref().and_then(|p| p.parse().ok())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

/// `[resource_config]`: what `serverless create` should produce, plus the
/// function list merged into `serverless.yml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResourceConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub template: Option<String>,

    #[serde(default)]
    pub template_url: Option<String>,

    #[serde(default)]
    pub template_path: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,

    /// Keys with no flag mapping. Never passed to `serverless`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One entry of `resource_config.functions`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FunctionDescriptor {
    pub name: String,

    pub handler: String,

    #[serde(default)]
    pub events: Option<Vec<Value>>,

    #[serde(default)]
    pub environment: Option<BTreeMap<String, Value>>,

    /// Source file, relative to the resource directory, copied into the
    /// service root during `configure`.
    #[serde(default)]
    pub path: Option<String>,

    /// Any other manifest keys (`memorySize`, `timeout`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `[serverless_config]`: where the executable lives and what extra
/// environment it runs with.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerlessConfig {
    #[serde(default)]
    pub executable_path: Option<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[[relationships]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RelationshipConfig {
    pub target: String,
}
