// tests/service_lifecycle.rs

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use serverless_plugin::config::NodeProperties;
use serverless_plugin::fs::mock::MockFileSystem;
use serverless_plugin::fs::FileSystem;
use serverless_plugin::lifecycle::{run_operation, OperationContext};
use serverless_plugin::state::{InstanceRecord, INFO_OUTPUT, INVOKE_OUTPUT, METRICS_OUTPUT, ROOT_DIRECTORY};
use serverless_plugin::types::{NodeType, Operation};
use serverless_plugin_test_utils::builders::{FunctionBuilder, PropertiesBuilder};
use serverless_plugin_test_utils::fake_backend::RecordingBackend;
use serverless_plugin_test_utils::{init_tracing, with_timeout};

const EXE: &str = "/opt/sls/serverless";
const ROOT: &str = "/work/test_sl_012345";
const RESOURCES: &str = "/blueprint";

fn mock_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_executable(EXE);
    fs
}

fn context<'a>(
    props: &'a NodeProperties,
    fs: &'a MockFileSystem,
    backend: &'a RecordingBackend,
) -> OperationContext<'a> {
    OperationContext {
        properties: props,
        instance: InstanceRecord::new("test_sl_012345", NodeType::Service.type_hierarchy()),
        linked: Vec::new(),
        root_directory: PathBuf::from(ROOT),
        resource_directory: PathBuf::from(RESOURCES),
        fs,
        backend,
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn create_runs_serverless_create_with_resource_options() {
    init_tracing();
    let props = PropertiesBuilder::new().executable_path(EXE).build();
    let fs = mock_fs();
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    with_timeout(run_operation(&mut ctx, Operation::Create, None))
        .await
        .unwrap();

    assert_eq!(
        backend.argvs(),
        vec![args(&[EXE, "create", "--name", "bar", "--template", "baz"])]
    );
    let call = backend.last().unwrap();
    assert_eq!(call.cwd, PathBuf::from(ROOT));
    assert!(!call.capture_output);
    assert_eq!(ctx.instance.get_str(ROOT_DIRECTORY), Some(ROOT));
    assert!(fs.exists(Path::new(ROOT)));
}

#[tokio::test]
async fn unknown_resource_keys_never_reach_the_command_line() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .resource_extra("region", "eu-west-1")
        .build();
    let fs = mock_fs();
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Create, None).await.unwrap();

    let argv = &backend.argvs()[0];
    assert!(!argv.iter().any(|a| a.contains("region") || a == "eu-west-1"));
}

#[tokio::test]
async fn configure_registers_aws_credentials_and_merges_manifest() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .provider("aws")
        .executable_path(EXE)
        .function(FunctionBuilder::qux().path("src/handler.js").build())
        .build();
    let fs = mock_fs();
    fs.add_file("/blueprint/src/handler.js", "exports.quux = () => {};");
    fs.add_file(
        "/work/test_sl_012345/serverless.yml",
        "service: bar\nprovider:\n  name: aws\nfunctions:\n  old:\n    handler: old.handler\n",
    );
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Configure, None).await.unwrap();

    assert_eq!(
        backend.argvs(),
        vec![args(&[
            EXE,
            "config",
            "credentials",
            "--provider",
            "aws",
            "--key",
            "secret_name",
            "--secret",
            "super_secret",
        ])]
    );

    let call = backend.last().unwrap();
    assert_eq!(call.env.get("AWS_ACCESS_KEY_ID").map(String::as_str), Some("secret_name"));
    assert_eq!(
        call.env.get("AWS_SECRET_ACCESS_KEY").map(String::as_str),
        Some("super_secret")
    );
    assert!(!call.display_command().contains("super_secret"));
    assert!(call.display_command().contains("***"));

    // function source copied next to the manifest
    let copied = fs
        .read_to_string(Path::new("/work/test_sl_012345/src/handler.js"))
        .unwrap();
    assert!(copied.contains("quux"));

    let manifest = fs
        .read_to_string(Path::new("/work/test_sl_012345/serverless.yml"))
        .unwrap();
    let doc: Value = serde_yaml::from_str(&manifest).unwrap();
    assert_eq!(doc["service"], Value::from("bar"));
    assert_eq!(doc["provider"]["name"], Value::from("aws"));

    let functions = doc["functions"].as_sequence().unwrap();
    assert_eq!(functions.len(), 1);
    let qux = &functions[0]["qux"];
    assert_eq!(qux["handler"], Value::from("quux"));
    assert_eq!(qux["events"][0], Value::from("bongo"));
    assert_eq!(qux["environment"]["taco"], Value::from("bell"));
    assert!(qux.get("path").is_none());
}

#[tokio::test]
async fn configure_for_other_providers_only_merges_manifest() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .function(FunctionBuilder::qux().build())
        .build();
    let fs = mock_fs();
    fs.add_file("/work/test_sl_012345/serverless.yml", "service: bar\n");
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Configure, None).await.unwrap();

    assert!(backend.invocations().is_empty());
    let manifest = fs
        .read_to_string(Path::new("/work/test_sl_012345/serverless.yml"))
        .unwrap();
    assert!(manifest.contains("quux"));
}

#[tokio::test]
async fn configure_without_manifest_is_non_recoverable() {
    init_tracing();
    let props = PropertiesBuilder::new().executable_path(EXE).build();
    let fs = mock_fs();
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    let err = run_operation(&mut ctx, Operation::Configure, None)
        .await
        .unwrap_err();
    assert!(err.message.contains("serverless.yml"), "got: {err}");
}

#[tokio::test]
async fn configure_rejects_function_paths_outside_the_resource_directory() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .function(FunctionBuilder::qux().path("../../etc/passwd").build())
        .build();
    let fs = mock_fs();
    fs.add_file("/work/test_sl_012345/serverless.yml", "service: bar\n");
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    let err = run_operation(&mut ctx, Operation::Configure, None)
        .await
        .unwrap_err();
    assert!(err.message.contains("../../etc/passwd"), "got: {err}");
}

#[tokio::test]
async fn start_deploys_and_stop_removes() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .env("SLS_DEBUG", "*")
        .build();
    let fs = mock_fs();
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Start, None).await.unwrap();
    run_operation(&mut ctx, Operation::Stop, None).await.unwrap();

    assert_eq!(
        backend.argvs(),
        vec![args(&[EXE, "deploy"]), args(&[EXE, "remove"])]
    );
    for call in backend.invocations() {
        assert_eq!(call.env.get("SLS_DEBUG").map(String::as_str), Some("*"));
        // provider "foobar" gets no credential variables
        assert!(!call.env.contains_key("AWS_ACCESS_KEY_ID"));
    }
}

#[tokio::test]
async fn invoke_stores_output_per_function() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .function(FunctionBuilder::qux().build())
        .function(FunctionBuilder::new("corge", "grault").build())
        .build();
    let fs = mock_fs();
    let backend = RecordingBackend::new().respond("invoke", "{\"statusCode\": 200}");
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Invoke, None).await.unwrap();

    assert_eq!(
        backend.argvs(),
        vec![
            args(&[EXE, "invoke", "--function", "qux"]),
            args(&[EXE, "invoke", "--function", "corge"]),
        ]
    );
    assert!(backend.invocations().iter().all(|i| i.capture_output));

    let table = ctx.instance.runtime_properties[INVOKE_OUTPUT]
        .as_table()
        .unwrap();
    assert_eq!(table["qux"].as_str(), Some("{\"statusCode\": 200}"));
    assert_eq!(table["corge"].as_str(), Some("{\"statusCode\": 200}"));
}

#[tokio::test]
async fn invoke_single_function_by_name() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .function(FunctionBuilder::qux().build())
        .function(FunctionBuilder::new("corge", "grault").build())
        .build();
    let fs = mock_fs();
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Invoke, Some("corge"))
        .await
        .unwrap();
    assert_eq!(
        backend.argvs(),
        vec![args(&[EXE, "invoke", "--function", "corge"])]
    );

    let err = run_operation(&mut ctx, Operation::Invoke, Some("missing"))
        .await
        .unwrap_err();
    assert!(err.message.contains("missing"));
    assert_eq!(backend.invocations().len(), 1);
}

#[tokio::test]
async fn invoke_without_functions_fails_without_running_anything() {
    init_tracing();
    let props = PropertiesBuilder::new().executable_path(EXE).build();
    let fs = mock_fs();
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    let err = run_operation(&mut ctx, Operation::Invoke, None)
        .await
        .unwrap_err();
    assert!(err.message.contains("no functions"));
    assert!(backend.invocations().is_empty());
}

#[tokio::test]
async fn metrics_without_functions_are_service_wide() {
    init_tracing();
    let props = PropertiesBuilder::new().executable_path(EXE).build();
    let fs = mock_fs();
    let backend = RecordingBackend::new().respond("metrics", "Invocations: 3");
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Metrics, None).await.unwrap();

    assert_eq!(backend.argvs(), vec![args(&[EXE, "metrics"])]);
    assert_eq!(ctx.instance.get_str(METRICS_OUTPUT), Some("Invocations: 3"));
}

#[tokio::test]
async fn metrics_per_declared_function() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .executable_path(EXE)
        .function(FunctionBuilder::qux().build())
        .build();
    let fs = mock_fs();
    let backend = RecordingBackend::new().respond("metrics", "Invocations: 1");
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Metrics, None).await.unwrap();

    assert_eq!(
        backend.argvs(),
        vec![args(&[EXE, "metrics", "--function", "qux"])]
    );
    let table = ctx.instance.runtime_properties[METRICS_OUTPUT]
        .as_table()
        .unwrap();
    assert_eq!(table["qux"].as_str(), Some("Invocations: 1"));
}

#[tokio::test]
async fn info_then_delete_clears_recorded_outputs() {
    init_tracing();
    let props = PropertiesBuilder::new().executable_path(EXE).build();
    let fs = mock_fs();
    let backend = RecordingBackend::new().respond("info", "service: bar\nstage: dev");
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Info, None).await.unwrap();
    assert_eq!(ctx.instance.get_str(INFO_OUTPUT), Some("service: bar\nstage: dev"));

    run_operation(&mut ctx, Operation::Delete, None).await.unwrap();

    // delete runs nothing
    assert_eq!(backend.argvs(), vec![args(&[EXE, "info"])]);
    assert!(ctx.instance.get_str(INFO_OUTPUT).is_none());
    assert_eq!(ctx.instance.get_str(ROOT_DIRECTORY), Some(ROOT));
}

#[tokio::test]
async fn failing_command_becomes_non_recoverable_error() {
    init_tracing();
    let props = PropertiesBuilder::new().executable_path(EXE).build();
    let fs = mock_fs();
    let backend = RecordingBackend::new().fail("deploy", 1);
    let mut ctx = context(&props, &fs, &backend);

    let err = run_operation(&mut ctx, Operation::Start, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.message,
        format!("Command `{EXE} deploy` failed with exit code 1")
    );
}

#[tokio::test]
async fn failed_credentials_command_never_reports_the_secret() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .provider("aws")
        .executable_path(EXE)
        .build();
    let fs = mock_fs();
    fs.add_file("/work/test_sl_012345/serverless.yml", "service: bar\n");
    let backend = RecordingBackend::new().fail("config", 1);
    let mut ctx = context(&props, &fs, &backend);

    let err = run_operation(&mut ctx, Operation::Configure, None)
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("super_secret"), "got: {err}");
    assert_eq!(
        err.message,
        format!(
            "Command `{EXE} config credentials --provider aws --key secret_name --secret ***` failed with exit code 1"
        )
    );
}

#[tokio::test]
async fn provider_name_is_normalised_on_the_command_line() {
    init_tracing();
    let props = PropertiesBuilder::new()
        .provider("AWS")
        .executable_path(EXE)
        .build();
    let fs = mock_fs();
    fs.add_file("/work/test_sl_012345/serverless.yml", "service: bar\n");
    let backend = RecordingBackend::new();
    let mut ctx = context(&props, &fs, &backend);

    run_operation(&mut ctx, Operation::Configure, None).await.unwrap();

    let call = backend.last().unwrap();
    assert_eq!(call.argv[1..5], ["config", "credentials", "--provider", "aws"]);
    assert_eq!(call.env.get("AWS_ACCESS_KEY_ID").map(String::as_str), Some("secret_name"));
}
