// src/lifecycle/binary.rs

//! Binary provider nodes: own a downloaded `serverless` executable that
//! service nodes pick up through a relationship.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::{PluginError, Result};
use crate::exec::Invocation;
use crate::lifecycle::OperationContext;
use crate::resolver::validate_executable;
use crate::state::EXECUTABLE_PATH;

/// File name of the downloaded binary inside the root directory.
pub const BINARY_FILE: &str = "serverless";

/// Make an executable available and record it under `executable_path`.
///
/// A configured `executable_path` is used as-is; otherwise the binary is
/// downloaded from `installation_source` with `curl` and marked executable.
pub async fn install(ctx: &mut OperationContext<'_>) -> Result<()> {
    let configured = ctx.properties.serverless_config.executable_path.as_deref();
    if let Some(path) = validate_executable(ctx.fs, configured)? {
        info!(instance = %ctx.instance.id, path = %path, "using existing serverless binary");
        ctx.instance.set_str(EXECUTABLE_PATH, path.to_arg());
        return Ok(());
    }

    let source = ctx
        .properties
        .installation_source
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            PluginError::ConfigError(
                "installation_source is required to download the serverless binary".to_string(),
            )
        })?;

    let target = ctx.root_directory.join(BINARY_FILE);
    let target_arg = target.to_string_lossy().into_owned();
    let argv = download_argv(&target, source);

    info!(instance = %ctx.instance.id, source, target = %target.display(), "downloading serverless binary");
    ctx.backend
        .run(Invocation::new(argv, ctx.root_directory.clone()))
        .await?;

    ctx.fs.set_user_executable(&target)?;
    let path = validate_executable(ctx.fs, Some(&target_arg))?.ok_or(PluginError::ExecutableNotFound)?;
    ctx.instance.set_str(EXECUTABLE_PATH, path.to_arg());
    Ok(())
}

/// `curl` command line fetching `source` into `target`.
///
/// `-f` makes an HTTP error status a non-zero exit, so an error page is
/// never written out as the binary.
pub fn download_argv(target: &Path, source: &str) -> Vec<String> {
    vec![
        "curl".to_string(),
        "-fsSL".to_string(),
        "-o".to_string(),
        target.to_string_lossy().into_owned(),
        source.to_string(),
    ]
}

/// Forget the recorded executable, removing it when this node downloaded it.
pub fn uninstall(ctx: &mut OperationContext<'_>) -> Result<()> {
    let Some(toml::Value::String(recorded)) = ctx.instance.remove(EXECUTABLE_PATH) else {
        return Ok(());
    };

    let downloaded = ctx.root_directory.join(BINARY_FILE);
    if downloaded.as_path() == Path::new(&recorded) {
        if ctx.fs.exists(&downloaded) {
            ctx.fs.remove_file(&downloaded)?;
            info!(instance = %ctx.instance.id, path = %downloaded.display(), "removed serverless binary");
        }
    } else {
        warn!(
            instance = %ctx.instance.id,
            path = %recorded,
            "executable was not downloaded by this node; leaving it in place"
        );
    }
    Ok(())
}
