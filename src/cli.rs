// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::Operation;

/// Command-line arguments for `serverless-plugin`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "serverless-plugin",
    version,
    about = "Drive the Serverless Framework CLI through a managed node's lifecycle.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the node properties file (TOML).
    ///
    /// Function `path` entries are resolved relative to its directory.
    #[arg(long, value_name = "PATH", default_value = "serverless-node.toml")]
    pub properties: String,

    /// Id of the node instance to operate on.
    #[arg(long, value_name = "ID")]
    pub instance_id: String,

    /// Directory holding persisted instance state and per-instance working
    /// directories.
    #[arg(long, value_name = "DIR", default_value = ".serverless-plugin")]
    pub state_dir: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SERVERLESS_PLUGIN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the executable and print the command lines, but don't run
    /// anything or persist state.
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub operation: OperationCommand,
}

/// Operation to run.
#[derive(Debug, Clone, Subcommand)]
pub enum OperationCommand {
    /// `serverless create` (service) or install the binary (binary node).
    Create,
    /// Register credentials and merge functions into `serverless.yml`.
    Configure,
    /// `serverless deploy`.
    Start,
    /// `serverless remove`.
    Stop,
    /// Clean up recorded state.
    Delete,
    /// `serverless invoke --function <name>`.
    Invoke {
        /// Only invoke this function (default: every declared function).
        #[arg(long, value_name = "NAME")]
        function: Option<String>,
    },
    /// `serverless metrics [--function <name>]`.
    Metrics {
        /// Only collect metrics for this function.
        #[arg(long, value_name = "NAME")]
        function: Option<String>,
    },
    /// `serverless info`.
    Info,
}

impl OperationCommand {
    pub fn operation(&self) -> Operation {
        match self {
            OperationCommand::Create => Operation::Create,
            OperationCommand::Configure => Operation::Configure,
            OperationCommand::Start => Operation::Start,
            OperationCommand::Stop => Operation::Stop,
            OperationCommand::Delete => Operation::Delete,
            OperationCommand::Invoke { .. } => Operation::Invoke,
            OperationCommand::Metrics { .. } => Operation::Metrics,
            OperationCommand::Info => Operation::Info,
        }
    }

    pub fn function(&self) -> Option<&str> {
        match self {
            OperationCommand::Invoke { function } | OperationCommand::Metrics { function } => {
                function.as_deref()
            }
            _ => None,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
