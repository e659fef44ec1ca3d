// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod lifecycle;
pub mod logging;
pub mod resolver;
pub mod serverless;
pub mod state;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::errors::PluginError;
use crate::exec::ProcessBackend;
use crate::fs::RealFileSystem;
use crate::lifecycle::{
    load_instances, planned_commands, run_operation, NonRecoverableError, OperationContext,
};
use crate::state::{FileStateStore, StateStore, ROOT_DIRECTORY};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - properties loading and validation
/// - persisted instance state (own record + linked records)
/// - the operation itself, run against a real process backend
/// - persisting the instance record afterwards, also after a failure
pub async fn run(args: CliArgs) -> Result<(), NonRecoverableError> {
    let properties_path = PathBuf::from(&args.properties);
    let props = load_and_validate(&properties_path)?;

    let store = FileStateStore::new(&args.state_dir);
    let (instance, linked) = load_instances(&store, &props, &args.instance_id)?;

    let root_directory = instance
        .get_str(ROOT_DIRECTORY)
        .map(PathBuf::from)
        .unwrap_or_else(|| store.dir().join(&args.instance_id));
    // Children run with this as their cwd; keep it absolute.
    let root_directory = std::path::absolute(&root_directory).map_err(PluginError::from)?;

    let fs = RealFileSystem;
    let backend = ProcessBackend;
    let mut ctx = OperationContext {
        properties: &props,
        instance,
        linked,
        root_directory,
        resource_directory: resource_root_dir(&properties_path),
        fs: &fs,
        backend: &backend,
    };

    let operation = args.operation.operation();
    let function = args.operation.function();

    if args.dry_run {
        let plan = planned_commands(&mut ctx, operation, function)?;
        print_dry_run(&ctx, operation, &plan);
        return Ok(());
    }

    let outcome = run_operation(&mut ctx, operation, function).await;

    if let Err(save_err) = store.save(&ctx.instance) {
        error!(instance = %ctx.instance.id, error = %save_err, "failed to persist instance state");
        return match outcome {
            Ok(()) => Err(save_err.into()),
            Err(op_err) => Err(op_err),
        };
    }
    debug!(instance = %ctx.instance.id, "instance state saved");

    outcome
}

/// Directory that function `path` entries are resolved against.
///
/// - If the properties path has a non-empty parent (e.g. "blueprints/node.toml"),
///   we use that directory.
/// - If it's just a bare filename, we fall back to the current working
///   directory "."
fn resource_root_dir(properties_path: &Path) -> PathBuf {
    match properties_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print the resolved context and command lines.
fn print_dry_run(ctx: &OperationContext<'_>, operation: types::Operation, plan: &[Vec<String>]) {
    println!("serverless-plugin dry-run");
    println!("  instance = {}", ctx.instance.id);
    println!("  node_type = {}", ctx.properties.node_type.type_name());
    println!("  operation = {operation}");
    println!("  root_directory = {}", ctx.root_directory.display());
    println!();

    if plan.is_empty() {
        println!("no external commands would run");
        return;
    }

    println!("commands ({}):", plan.len());
    let secret = ctx
        .properties
        .client_config
        .credentials
        .as_ref()
        .map(|c| c.secret.as_str());
    for argv in plan {
        let line: Vec<&str> = argv
            .iter()
            .map(|a| if Some(a.as_str()) == secret { "***" } else { a.as_str() })
            .collect();
        println!("  - {}", line.join(" "));
    }
}
