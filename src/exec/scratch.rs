// src/exec/scratch.rs

//! Per-invocation scratch directory.

use std::path::Path;

use anyhow::Context;
use tempfile::TempDir;

use crate::errors::Result;

/// Variables pointed at the scratch directory for the child process.
pub const TEMP_VARS: [&str; 3] = ["TMP", "TEMP", "TMPDIR"];

/// A private temporary directory that lives exactly as long as this value.
///
/// The directory is removed when the guard is dropped, so every exit path
/// of the caller cleans it up.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn acquire() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("serverless-")
            .tempdir()
            .context("creating scratch directory")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `(name, value)` pairs for [`TEMP_VARS`].
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let value = self.path().to_string_lossy().into_owned();
        TEMP_VARS.iter().map(|name| (*name, value.clone())).collect()
    }
}
