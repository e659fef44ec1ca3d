use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Type name of nodes that own a downloaded `serverless` binary.
pub const BINARY_TYPE: &str = "cloudify.nodes.serverless.Binary";

/// Type name of nodes that manage a Serverless service.
pub const SERVICE_TYPE: &str = "cloudify.nodes.serverless.Service";

/// Root of every node type hierarchy.
pub const ROOT_TYPE: &str = "cloudify.nodes.Root";

/// Kind of managed node a properties file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NodeType {
    #[serde(rename = "cloudify.nodes.serverless.Service")]
    Service,
    #[serde(rename = "cloudify.nodes.serverless.Binary")]
    Binary,
}

impl Default for NodeType {
    fn default() -> Self {
        NodeType::Service
    }
}

impl NodeType {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeType::Service => SERVICE_TYPE,
            NodeType::Binary => BINARY_TYPE,
        }
    }

    /// Type hierarchy recorded for instances of this node.
    pub fn type_hierarchy(&self) -> Vec<String> {
        vec![ROOT_TYPE.to_string(), self.type_name().to_string()]
    }
}

/// Cloud provider named in `client_config.provider`.
///
/// Only `aws` gets credential handling; every other value is carried as-is
/// so it can still be passed to `serverless` and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Aws,
    Other(String),
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err("provider must not be empty".to_string()),
            "aws" => Ok(Provider::Aws),
            _ => Ok(Provider::Other(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Aws => f.write_str("aws"),
            Provider::Other(name) => f.write_str(name),
        }
    }
}

/// Lifecycle and day-2 operations the plugin can run against a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Configure,
    Start,
    Stop,
    Delete,
    Invoke,
    Metrics,
    Info,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Configure => "configure",
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Delete => "delete",
            Operation::Invoke => "invoke",
            Operation::Metrics => "metrics",
            Operation::Info => "info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
