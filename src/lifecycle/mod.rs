// src/lifecycle/mod.rs

//! Lifecycle operations against one managed node instance.
//!
//! Every operation receives an explicit [`OperationContext`]: the node
//! properties, the instance record (mutated in place), the records of linked
//! instances and the directories it works in. Nothing is read from ambient
//! state. [`run_operation`] is the boundary to the orchestrator: any error is
//! reported as a [`NonRecoverableError`].
//!
//! - [`service`]: `cloudify.nodes.serverless.Service` nodes.
//! - [`binary`]: `cloudify.nodes.serverless.Binary` nodes.
//! - [`plan`]: the command lines an operation would run (`--dry-run`).

pub mod binary;
pub mod error;
pub mod plan;
pub mod service;

use std::path::PathBuf;

use tracing::{error, info};

use crate::config::NodeProperties;
use crate::errors::{PluginError, Result};
use crate::exec::CommandBackend;
use crate::fs::FileSystem;
use crate::resolver::{resolve_executable, ExecutablePath};
use crate::serverless::Serverless;
use crate::state::{InstanceRecord, StateStore, ROOT_DIRECTORY};
use crate::types::{NodeType, Operation};

pub use error::NonRecoverableError;
pub use plan::planned_commands;

/// Everything one lifecycle action needs, passed explicitly.
pub struct OperationContext<'a> {
    pub properties: &'a NodeProperties,

    /// The managed instance; updated by the operation and persisted by the
    /// caller afterwards.
    pub instance: InstanceRecord,

    /// Records of the instances named in `properties.relationships`.
    pub linked: Vec<InstanceRecord>,

    /// Working directory of the service (`serverless.yml` lives here).
    pub root_directory: PathBuf,

    /// Directory function `path` entries are relative to.
    pub resource_directory: PathBuf,

    pub fs: &'a dyn FileSystem,
    pub backend: &'a dyn CommandBackend,
}

impl<'a> OperationContext<'a> {
    /// Run the resolver against this context, caching into `instance`.
    pub fn resolve_executable(&mut self) -> Result<ExecutablePath> {
        resolve_executable(
            &self.properties.serverless_config,
            &mut self.instance,
            &self.linked,
            self.fs,
        )
    }

    /// Resolve the executable and build a client for it.
    pub fn serverless(&mut self) -> Result<Serverless<'a>> {
        let executable = self.resolve_executable()?;
        Ok(Serverless::new(
            self.properties,
            executable,
            self.root_directory.clone(),
            self.backend,
            self.fs,
        ))
    }

    fn prepare_root_directory(&mut self) -> Result<()> {
        self.fs.create_dir_all(&self.root_directory)?;
        let root = self.root_directory.to_string_lossy().into_owned();
        self.instance.set_str(ROOT_DIRECTORY, root);
        Ok(())
    }
}

/// Load the instance record and its linked records from `store`.
///
/// A never-saved instance starts with an empty record of the node's type.
/// A relationship target with no saved record is a configuration error.
pub fn load_instances(
    store: &dyn StateStore,
    properties: &NodeProperties,
    instance_id: &str,
) -> Result<(InstanceRecord, Vec<InstanceRecord>)> {
    let instance = store
        .load(instance_id)?
        .unwrap_or_else(|| InstanceRecord::new(instance_id, properties.node_type.type_hierarchy()));

    let mut linked = Vec::with_capacity(properties.relationships.len());
    for rel in properties.relationships.iter() {
        let record = store.load(&rel.target)?.ok_or_else(|| {
            PluginError::ConfigError(format!(
                "relationship target '{}' has no recorded state",
                rel.target
            ))
        })?;
        linked.push(record);
    }

    Ok((instance, linked))
}

/// Run `operation`, converting any failure into a [`NonRecoverableError`].
///
/// `function` narrows `invoke`/`metrics` to one declared function.
pub async fn run_operation(
    ctx: &mut OperationContext<'_>,
    operation: Operation,
    function: Option<&str>,
) -> std::result::Result<(), NonRecoverableError> {
    info!(
        instance = %ctx.instance.id,
        operation = %operation,
        node_type = ctx.properties.node_type.type_name(),
        "running lifecycle operation"
    );

    match dispatch(ctx, operation, function).await {
        Ok(()) => {
            info!(instance = %ctx.instance.id, operation = %operation, "operation finished");
            Ok(())
        }
        Err(err) => {
            error!(
                instance = %ctx.instance.id,
                operation = %operation,
                error = %err,
                "operation failed"
            );
            Err(NonRecoverableError::from(err))
        }
    }
}

async fn dispatch(
    ctx: &mut OperationContext<'_>,
    operation: Operation,
    function: Option<&str>,
) -> Result<()> {
    ctx.prepare_root_directory()?;

    match ctx.properties.node_type {
        NodeType::Service => match operation {
            Operation::Create => service::create(ctx).await,
            Operation::Configure => service::configure(ctx).await,
            Operation::Start => service::start(ctx).await,
            Operation::Stop => service::stop(ctx).await,
            Operation::Delete => service::delete(ctx),
            Operation::Invoke => service::invoke(ctx, function).await,
            Operation::Metrics => service::metrics(ctx, function).await,
            Operation::Info => service::info(ctx).await,
        },
        NodeType::Binary => match operation {
            Operation::Create => binary::install(ctx).await,
            Operation::Delete => binary::uninstall(ctx),
            other => {
                info!(
                    instance = %ctx.instance.id,
                    operation = %other,
                    "nothing to do for a binary node"
                );
                Ok(())
            }
        },
    }
}
