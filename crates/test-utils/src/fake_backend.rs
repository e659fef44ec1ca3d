use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serverless_plugin::errors::PluginError;
use serverless_plugin::exec::{BackendFuture, CommandBackend, Invocation};

/// A fake backend that:
/// - records every invocation it receives
/// - answers captured runs with canned stdout keyed by subcommand
/// - fails with a chosen exit code for chosen subcommands.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    stdout: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<HashMap<String, i32>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `output` whenever `subcommand` runs with capture enabled.
    pub fn respond(self, subcommand: &str, output: &str) -> Self {
        self.stdout
            .lock()
            .unwrap()
            .insert(subcommand.to_string(), output.to_string());
        self
    }

    /// Make `subcommand` exit with `code`.
    pub fn fail(self, subcommand: &str, code: i32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(subcommand.to_string(), code);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.invocations().into_iter().map(|i| i.argv).collect()
    }

    pub fn last(&self) -> Option<Invocation> {
        self.invocations.lock().unwrap().last().cloned()
    }
}

impl CommandBackend for RecordingBackend {
    fn run<'a>(&'a self, invocation: Invocation) -> BackendFuture<'a> {
        Box::pin(async move {
            self.invocations.lock().unwrap().push(invocation.clone());

            let subcommand = invocation.subcommand().unwrap_or_default().to_string();
            if let Some(code) = self.failures.lock().unwrap().get(&subcommand).copied() {
                return Err(PluginError::CommandFailed {
                    command: invocation.display_command(),
                    argv: invocation.argv,
                    code,
                });
            }

            if !invocation.capture_output {
                return Ok(None);
            }
            let out = self
                .stdout
                .lock()
                .unwrap()
                .get(&subcommand)
                .cloned()
                .unwrap_or_default();
            Ok(Some(out))
        })
    }
}
