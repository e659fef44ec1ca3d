// src/exec/backend.rs

//! Pluggable command backend.
//!
//! Lifecycle code talks to a `CommandBackend` instead of spawning processes
//! itself, so tests can record invocations without running anything.
//!
//! [`ProcessBackend`] runs real processes via [`run_process`].

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::invocation::Invocation;
use crate::exec::runner::run_process;

pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>>;

/// Trait abstracting how a command is executed.
pub trait CommandBackend: Send + Sync {
    /// Run `invocation` to completion.
    ///
    /// Returns captured stdout when `invocation.capture_output` is set.
    fn run<'a>(&'a self, invocation: Invocation) -> BackendFuture<'a>;
}

/// Backend used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessBackend;

impl CommandBackend for ProcessBackend {
    fn run<'a>(&'a self, invocation: Invocation) -> BackendFuture<'a> {
        Box::pin(async move { run_process(&invocation).await })
    }
}
