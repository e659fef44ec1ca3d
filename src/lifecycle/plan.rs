// src/lifecycle/plan.rs

//! Command lines an operation would run, without running them.

use crate::errors::Result;
use crate::lifecycle::binary::{download_argv, BINARY_FILE};
use crate::lifecycle::service::select_functions;
use crate::lifecycle::OperationContext;
use crate::resolver::validate_executable;
use crate::types::{NodeType, Operation, Provider};

/// The argv of every process `operation` would spawn, in order.
///
/// Resolves the executable exactly like a real run (so resolution errors
/// surface), but never touches the backend.
pub fn planned_commands(
    ctx: &mut OperationContext<'_>,
    operation: Operation,
    function: Option<&str>,
) -> Result<Vec<Vec<String>>> {
    match ctx.properties.node_type {
        NodeType::Binary => plan_binary(ctx, operation),
        NodeType::Service => plan_service(ctx, operation, function),
    }
}

fn plan_binary(ctx: &OperationContext<'_>, operation: Operation) -> Result<Vec<Vec<String>>> {
    if operation != Operation::Create {
        return Ok(Vec::new());
    }
    let configured = ctx.properties.serverless_config.executable_path.as_deref();
    if validate_executable(ctx.fs, configured)?.is_some() {
        return Ok(Vec::new());
    }
    let target = ctx.root_directory.join(BINARY_FILE);
    let source = ctx.properties.installation_source.as_deref().unwrap_or_default();
    Ok(vec![download_argv(&target, source)])
}

fn plan_service(
    ctx: &mut OperationContext<'_>,
    operation: Operation,
    function: Option<&str>,
) -> Result<Vec<Vec<String>>> {
    if operation == Operation::Delete {
        return Ok(Vec::new());
    }

    let targets = select_functions(ctx, function)?;
    let sls = ctx.serverless()?;

    let plan = match operation {
        Operation::Create => vec![sls.create_argv()],
        Operation::Configure => match sls.provider() {
            Some(Provider::Aws) => vec![sls.command(sls.credentials_command()?)],
            _ => Vec::new(),
        },
        Operation::Start => vec![sls.deploy_argv()],
        Operation::Stop => vec![sls.remove_argv()],
        Operation::Invoke => targets.iter().map(|name| sls.invoke_argv(name)).collect(),
        Operation::Metrics if targets.is_empty() => vec![sls.metrics_argv(None)],
        Operation::Metrics => targets
            .iter()
            .map(|name| sls.metrics_argv(Some(name)))
            .collect(),
        Operation::Info => vec![sls.info_argv()],
        Operation::Delete => Vec::new(),
    };
    Ok(plan)
}
