// src/lifecycle/service.rs

use tracing::{debug, info};

use crate::config::FunctionDescriptor;
use crate::errors::{PluginError, Result};
use crate::lifecycle::OperationContext;
use crate::state::{INFO_OUTPUT, INVOKE_OUTPUT, METRICS_OUTPUT};

/// `serverless create <options>`
pub async fn create(ctx: &mut OperationContext<'_>) -> Result<()> {
    let sls = ctx.serverless()?;
    sls.create().await
}

/// Copy function sources into the root directory, register credentials and
/// merge functions into `serverless.yml`.
pub async fn configure(ctx: &mut OperationContext<'_>) -> Result<()> {
    let sls = ctx.serverless()?;
    copy_function_sources(ctx)?;
    sls.configure().await
}

/// `serverless deploy`
pub async fn start(ctx: &mut OperationContext<'_>) -> Result<()> {
    let sls = ctx.serverless()?;
    sls.deploy().await
}

/// `serverless remove`
pub async fn stop(ctx: &mut OperationContext<'_>) -> Result<()> {
    let sls = ctx.serverless()?;
    sls.destroy().await
}

/// Runs no external process; drops outputs recorded by day-2 operations.
pub fn delete(ctx: &mut OperationContext<'_>) -> Result<()> {
    for key in [INVOKE_OUTPUT, METRICS_OUTPUT, INFO_OUTPUT] {
        if ctx.instance.remove(key).is_some() {
            debug!(instance = %ctx.instance.id, key, "cleared runtime property");
        }
    }
    Ok(())
}

/// `serverless invoke --function <name>` for one or every declared function.
pub async fn invoke(ctx: &mut OperationContext<'_>, function: Option<&str>) -> Result<()> {
    let targets = select_functions(ctx, function)?;
    if targets.is_empty() {
        return Err(PluginError::ConfigError(
            "no functions declared in resource_config.functions".to_string(),
        ));
    }

    let sls = ctx.serverless()?;
    for name in targets {
        let output = sls.invoke(&name).await?;
        ctx.instance.set_nested_str(INVOKE_OUTPUT, &name, output);
    }
    Ok(())
}

/// `serverless metrics [--function <name>]`.
///
/// With no declared functions and no explicit name, service-wide metrics are
/// stored directly under `metrics`.
pub async fn metrics(ctx: &mut OperationContext<'_>, function: Option<&str>) -> Result<()> {
    let targets = select_functions(ctx, function)?;
    let sls = ctx.serverless()?;

    if targets.is_empty() {
        let output = sls.metrics(None).await?;
        ctx.instance.set_str(METRICS_OUTPUT, output);
        return Ok(());
    }

    for name in targets {
        let output = sls.metrics(Some(&name)).await?;
        ctx.instance.set_nested_str(METRICS_OUTPUT, &name, output);
    }
    Ok(())
}

/// `serverless info`
pub async fn info(ctx: &mut OperationContext<'_>) -> Result<()> {
    let sls = ctx.serverless()?;
    let output = sls.info().await?;
    ctx.instance.set_str(INFO_OUTPUT, output);
    Ok(())
}

pub(crate) fn select_functions(
    ctx: &OperationContext<'_>,
    function: Option<&str>,
) -> Result<Vec<String>> {
    let declared = &ctx.properties.resource_config.functions;
    match function {
        Some(name) => {
            if declared.iter().any(|f| f.name == name) {
                Ok(vec![name.to_string()])
            } else {
                Err(PluginError::ConfigError(format!(
                    "function '{name}' is not declared in resource_config.functions"
                )))
            }
        }
        None => Ok(declared.iter().map(|f| f.name.clone()).collect()),
    }
}

/// Copy each function's `path` from the resource directory to the same
/// relative location under the root directory.
fn copy_function_sources(ctx: &OperationContext<'_>) -> Result<()> {
    for function in ctx.properties.resource_config.functions.iter() {
        if let Some(relative) = source_path(function)? {
            let from = ctx.resource_directory.join(relative);
            let to = ctx.root_directory.join(relative);
            ctx.fs.copy(&from, &to)?;
            info!(
                function = %function.name,
                from = %from.display(),
                to = %to.display(),
                "copied function source"
            );
        }
    }
    Ok(())
}

fn source_path(function: &FunctionDescriptor) -> Result<Option<&str>> {
    let Some(path) = function.path.as_deref().filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let escapes = std::path::Path::new(path)
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir));
    if escapes {
        return Err(PluginError::ConfigError(format!(
            "function '{}' path '{}' must be relative and stay inside the resource directory",
            function.name, path
        )));
    }
    Ok(Some(path))
}
