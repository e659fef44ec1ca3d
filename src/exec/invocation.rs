// src/exec/invocation.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything needed to run one external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Full argument vector, program first.
    pub argv: Vec<String>,

    /// Working directory of the child.
    pub cwd: PathBuf,

    /// Variables layered on top of the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Return stdout instead of relaying it to the log.
    pub capture_output: bool,

    /// Values masked as `***` whenever the command line is logged.
    pub secrets: Vec<String>,
}

impl Invocation {
    pub fn new(argv: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            cwd: cwd.into(),
            env: BTreeMap::new(),
            capture_output: false,
            secrets: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn capture(mut self, capture_output: bool) -> Self {
        self.capture_output = capture_output;
        self
    }

    pub fn with_secrets(mut self, secrets: Vec<String>) -> Self {
        self.secrets = secrets.into_iter().filter(|s| !s.is_empty()).collect();
        self
    }

    /// Subcommand (argv[1]), if any.
    pub fn subcommand(&self) -> Option<&str> {
        self.argv.get(1).map(String::as_str)
    }

    /// Command line for log output, secrets masked.
    pub fn display_command(&self) -> String {
        self.argv
            .iter()
            .map(|arg| {
                if self.secrets.iter().any(|s| s == arg) {
                    "***"
                } else {
                    arg.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
