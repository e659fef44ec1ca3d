// src/serverless/mod.rs

//! Client for the `serverless` command-line tool.
//!
//! [`Serverless`] turns node properties into concrete command lines and runs
//! them through a [`CommandBackend`]. Every `*_argv` method is pure, so the
//! same command lines can be printed by `--dry-run`.

pub mod env;
pub mod manifest;
pub mod options;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::NodeProperties;
use crate::errors::{PluginError, Result};
use crate::exec::{CommandBackend, Invocation};
use crate::fs::FileSystem;
use crate::resolver::ExecutablePath;
use crate::types::Provider;

pub use manifest::MANIFEST_FILE;
pub use options::{resource_options, SERVICE_FLAGS};

pub struct Serverless<'a> {
    properties: &'a NodeProperties,
    executable: ExecutablePath,
    root_directory: PathBuf,
    backend: &'a dyn CommandBackend,
    fs: &'a dyn FileSystem,
}

impl<'a> Serverless<'a> {
    pub fn new(
        properties: &'a NodeProperties,
        executable: ExecutablePath,
        root_directory: impl Into<PathBuf>,
        backend: &'a dyn CommandBackend,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self {
            properties,
            executable,
            root_directory: root_directory.into(),
            backend,
            fs,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root_directory.join(MANIFEST_FILE)
    }

    pub fn provider(&self) -> Option<Provider> {
        self.properties.client_config.provider()
    }

    pub fn options(&self) -> Vec<String> {
        resource_options(&self.properties.resource_config)
    }

    /// `[executable, args...]`
    pub fn command<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.executable.to_arg())
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    pub fn credentials_command(&self) -> Result<Vec<String>> {
        let provider = self.provider().ok_or_else(|| {
            PluginError::ConfigError("client_config.provider is required".to_string())
        })?;
        let creds = self.properties.client_config.credentials.as_ref().ok_or_else(|| {
            PluginError::ConfigError(format!(
                "client_config.credentials are required for provider '{provider}'"
            ))
        })?;
        Ok(vec![
            "config".to_string(),
            "credentials".to_string(),
            "--provider".to_string(),
            provider.to_string(),
            "--key".to_string(),
            creds.key.clone(),
            "--secret".to_string(),
            creds.secret.clone(),
        ])
    }

    pub fn create_argv(&self) -> Vec<String> {
        let mut args = vec!["create".to_string()];
        args.extend(self.options());
        self.command(args)
    }

    pub fn deploy_argv(&self) -> Vec<String> {
        self.command(["deploy"])
    }

    pub fn remove_argv(&self) -> Vec<String> {
        self.command(["remove"])
    }

    pub fn invoke_argv(&self, function: &str) -> Vec<String> {
        self.command(["invoke", "--function", function])
    }

    pub fn metrics_argv(&self, function: Option<&str>) -> Vec<String> {
        match function {
            Some(name) => self.command(["metrics", "--function", name]),
            None => self.command(["metrics"]),
        }
    }

    pub fn info_argv(&self) -> Vec<String> {
        self.command(["info"])
    }

    pub fn environment(&self) -> BTreeMap<String, String> {
        env::command_environment(
            &self.properties.client_config,
            &self.properties.serverless_config,
        )
    }

    fn secrets(&self) -> Vec<String> {
        self.properties
            .client_config
            .credentials
            .as_ref()
            .map(|c| vec![c.secret.clone()])
            .unwrap_or_default()
    }

    /// Run `argv` in the root directory with the command environment.
    pub async fn execute(&self, argv: Vec<String>, capture_output: bool) -> Result<Option<String>> {
        let invocation = Invocation::new(argv, &self.root_directory)
            .with_env(self.environment())
            .with_secrets(self.secrets())
            .capture(capture_output);
        self.backend.run(invocation).await
    }

    async fn execute_captured(&self, argv: Vec<String>) -> Result<String> {
        Ok(self.execute(argv, true).await?.unwrap_or_default())
    }

    pub async fn create(&self) -> Result<()> {
        self.execute(self.create_argv(), false).await?;
        Ok(())
    }

    /// Register provider credentials, then merge declared functions into
    /// the manifest.
    pub async fn configure(&self) -> Result<()> {
        match self.provider() {
            Some(Provider::Aws) => {
                let argv = self.command(self.credentials_command()?);
                self.execute(argv, false).await?;
            }
            Some(other) => {
                warn!(
                    provider = %other,
                    "credential configuration is only handled for aws; skipping"
                );
            }
            None => {
                warn!("no provider configured; skipping credential configuration");
            }
        }

        let path = self.manifest_path();
        manifest::update_manifest_file(self.fs, &path, &self.properties.resource_config.functions)?;
        info!(
            manifest = %path.display(),
            functions = self.properties.resource_config.functions.len(),
            "merged functions into manifest"
        );
        Ok(())
    }

    pub async fn deploy(&self) -> Result<()> {
        self.execute(self.deploy_argv(), false).await?;
        Ok(())
    }

    pub async fn destroy(&self) -> Result<()> {
        self.execute(self.remove_argv(), false).await?;
        Ok(())
    }

    pub async fn invoke(&self, function: &str) -> Result<String> {
        self.execute_captured(self.invoke_argv(function)).await
    }

    pub async fn metrics(&self, function: Option<&str>) -> Result<String> {
        self.execute_captured(self.metrics_argv(function)).await
    }

    pub async fn info(&self) -> Result<String> {
        self.execute_captured(self.info_argv()).await
    }
}
