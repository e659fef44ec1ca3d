// src/resolver.rs

//! Locating the `serverless` executable for one lifecycle action.
//!
//! Candidates are tried in a fixed order and the first valid one wins:
//!
//! 1. `serverless_config.executable_path` from the node properties,
//! 2. the instance's cached `executable_path` runtime property,
//! 3. the cached `executable_path` of the single linked binary provider
//!    (written back into the instance as a cache).
//!
//! An empty candidate falls through to the next one. A non-empty candidate
//! that is missing or not executable stops resolution with an error.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ServerlessConfig;
use crate::errors::{PluginError, Result};
use crate::fs::FileSystem;
use crate::state::{InstanceRecord, EXECUTABLE_PATH};
use crate::types::BINARY_TYPE;

/// A path that existed and was executable when it was validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutablePath(PathBuf);

impl ExecutablePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn to_arg(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl fmt::Display for ExecutablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Validate one candidate.
///
/// `Ok(None)` means there was no candidate at all (empty or absent).
/// A present candidate either validates or fails with
/// [`PluginError::FileDoesNotExist`] / [`PluginError::FileNotExecutable`].
pub fn validate_executable(
    fs: &dyn FileSystem,
    candidate: Option<&str>,
) -> Result<Option<ExecutablePath>> {
    let candidate = match candidate {
        Some(c) if !c.is_empty() => c,
        _ => return Ok(None),
    };

    let path = PathBuf::from(candidate);
    if !fs.exists(&path) {
        return Err(PluginError::FileDoesNotExist(path));
    }
    if !fs.is_executable(&path) {
        return Err(PluginError::FileNotExecutable(path));
    }
    Ok(Some(ExecutablePath(path)))
}

/// Resolve the executable for `instance`.
///
/// `linked` holds the records of every instance `instance` has a
/// relationship to. On a provider hit, `instance` gets the path cached under
/// `executable_path`; the caller is responsible for persisting it.
pub fn resolve_executable(
    config: &ServerlessConfig,
    instance: &mut InstanceRecord,
    linked: &[InstanceRecord],
    fs: &dyn FileSystem,
) -> Result<ExecutablePath> {
    if let Some(path) = validate_executable(fs, config.executable_path.as_deref())? {
        debug!(instance = %instance.id, path = %path, "using configured executable");
        return Ok(path);
    }

    if let Some(path) = validate_executable(fs, instance.get_str(EXECUTABLE_PATH))? {
        debug!(instance = %instance.id, path = %path, "using cached executable");
        return Ok(path);
    }

    let providers: Vec<&InstanceRecord> =
        linked.iter().filter(|rec| rec.is_of_type(BINARY_TYPE)).collect();

    match providers.as_slice() {
        [provider] => {
            if let Some(path) = validate_executable(fs, provider.get_str(EXECUTABLE_PATH))? {
                info!(
                    instance = %instance.id,
                    provider = %provider.id,
                    path = %path,
                    "using executable from linked binary provider"
                );
                instance.set_str(EXECUTABLE_PATH, path.to_arg());
                return Ok(path);
            }
            debug!(
                instance = %instance.id,
                provider = %provider.id,
                "linked binary provider has no executable path yet"
            );
        }
        [] => {}
        many => {
            warn!(
                instance = %instance.id,
                providers = many.len(),
                "more than one linked binary provider; refusing to pick one"
            );
        }
    }

    Err(PluginError::ExecutableNotFound)
}
