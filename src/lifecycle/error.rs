// src/lifecycle/error.rs

use std::error::Error as StdError;
use std::fmt;

use crate::errors::PluginError;

/// The single failure kind reported back to the orchestrator.
///
/// The orchestrator must not retry it; `causes` carries the source chain of
/// the underlying error, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonRecoverableError {
    pub message: String,
    pub causes: Vec<String>,
}

impl fmt::Display for NonRecoverableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for cause in self.causes.iter() {
            write!(f, "\n  caused by: {cause}")?;
        }
        Ok(())
    }
}

impl StdError for NonRecoverableError {}

impl From<PluginError> for NonRecoverableError {
    fn from(err: PluginError) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
        }
    }
}
