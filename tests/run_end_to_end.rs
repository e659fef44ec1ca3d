// tests/run_end_to_end.rs

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use serverless_plugin::cli::CliArgs;
use serverless_plugin::run;
use serverless_plugin::state::{FileStateStore, StateStore, EXECUTABLE_PATH, ROOT_DIRECTORY};
use serverless_plugin_test_utils::{init_tracing, with_timeout};

/// A stand-in `serverless` that appends its arguments to `calls.log` in its
/// working directory and answers `invoke`/`info` on stdout.
const FAKE_SERVERLESS: &str = r#"#!/bin/sh
echo "$@" >> calls.log
case "$1" in
  create) printf 'service: bar\nprovider:\n  name: aws\n' > serverless.yml ;;
  invoke) echo "hello from $3" ;;
  info) echo "stage: dev" ;;
  remove) [ -n "$FAIL_REMOVE" ] && exit 3 ;;
esac
exit 0
"#;

struct Workspace {
    _dir: TempDir,
    blueprint: PathBuf,
    state_dir: PathBuf,
    executable: PathBuf,
}

impl Workspace {
    fn new(extra_env: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let blueprint = dir.path().join("blueprint");
        let state_dir = dir.path().join("state");
        fs::create_dir_all(blueprint.join("src")).unwrap();

        let executable = dir.path().join("bin").join("serverless");
        fs::create_dir_all(executable.parent().unwrap()).unwrap();
        fs::write(&executable, FAKE_SERVERLESS).unwrap();
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(blueprint.join("src/handler.js"), "module.exports.quux = 1;\n").unwrap();
        fs::write(
            blueprint.join("node.toml"),
            format!(
                r#"
[client_config]
provider = "foobar"

[resource_config]
name = "bar"
template = "baz"

[[resource_config.functions]]
name = "qux"
handler = "quux"
path = "src/handler.js"

[serverless_config]
executable_path = "{}"
env = {{ {} }}
"#,
                executable.display(),
                extra_env
            ),
        )
        .unwrap();

        Self {
            _dir: dir,
            blueprint,
            state_dir,
            executable,
        }
    }

    fn args(&self, operation: &[&str]) -> CliArgs {
        let properties = self.blueprint.join("node.toml");
        let mut argv = vec![
            "serverless-plugin".to_string(),
            "--properties".to_string(),
            properties.display().to_string(),
            "--instance-id".to_string(),
            "svc".to_string(),
            "--state-dir".to_string(),
            self.state_dir.display().to_string(),
        ];
        argv.extend(operation.iter().map(|s| s.to_string()));
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn root(&self) -> PathBuf {
        self.state_dir.join("svc")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.root().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[tokio::test]
async fn full_lifecycle_against_a_fake_serverless() {
    init_tracing();
    let ws = Workspace::new("");

    let ops: [&[&str]; 5] = [&["create"], &["configure"], &["start"], &["invoke"], &["info"]];
    for op in ops {
        with_timeout(run(ws.args(op))).await.unwrap();
    }

    assert_eq!(
        ws.calls(),
        vec!["create --name bar --template baz", "deploy", "invoke --function qux", "info"]
    );

    let manifest = fs::read_to_string(ws.root().join("serverless.yml")).unwrap();
    assert!(manifest.contains("service: bar"));
    assert!(manifest.contains("quux"));
    assert!(ws.root().join("src/handler.js").is_file());

    let record = FileStateStore::new(&ws.state_dir)
        .load("svc")
        .unwrap()
        .unwrap();
    let root = std::path::absolute(ws.root()).unwrap();
    assert_eq!(
        record.get_str(ROOT_DIRECTORY),
        Some(root.to_string_lossy().as_ref())
    );
    let invoke = record.runtime_properties["invoke"].as_table().unwrap();
    assert_eq!(invoke["qux"].as_str(), Some("hello from qux\n"));
    assert_eq!(record.get_str("info"), Some("stage: dev\n"));
    assert!(record.get_str(EXECUTABLE_PATH).is_none());
    assert!(ws.executable.is_file());
}

#[tokio::test]
async fn failed_operation_still_persists_state() {
    init_tracing();
    let ws = Workspace::new(r#"FAIL_REMOVE = "1""#);

    run(ws.args(&["create"])).await.unwrap();
    let err = run(ws.args(&["stop"])).await.unwrap_err();

    assert!(err.message.ends_with("remove` failed with exit code 3"), "got: {err}");
    let record = FileStateStore::new(&ws.state_dir)
        .load("svc")
        .unwrap()
        .unwrap();
    assert!(record.get_str(ROOT_DIRECTORY).is_some());
}

#[tokio::test]
async fn dry_run_executes_nothing() {
    init_tracing();
    let ws = Workspace::new("");

    run(ws.args(&["--dry-run", "create"])).await.unwrap();

    assert!(ws.calls().is_empty());
    assert!(FileStateStore::new(&ws.state_dir).load("svc").unwrap().is_none());
}
