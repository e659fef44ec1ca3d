// src/errors.rs

//! Crate-wide error type and aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid executable path {0:?}: the file does not exist")]
    FileDoesNotExist(PathBuf),

    #[error("Invalid executable path {0:?}: the file is not executable")]
    FileNotExecutable(PathBuf),

    #[error("Failed to locate valid serverless executable.")]
    ExecutableNotFound,

    /// `argv` is exact; `command` is the same line with secrets masked and
    /// is the only form that reaches the message.
    #[error("Command `{command}` failed with exit code {code}")]
    CommandFailed {
        argv: Vec<String>,
        command: String,
        code: i32,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;
