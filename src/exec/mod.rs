// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] describes one command: argv, cwd, env overlay, capture.
//! - [`scratch`] owns the per-invocation temporary directory.
//! - [`runner`] spawns the child with `tokio::process::Command` and drains
//!   its output.
//! - [`backend`] provides the `CommandBackend` trait and the real
//!   `ProcessBackend`.

pub mod backend;
pub mod invocation;
pub mod runner;
pub mod scratch;

pub use backend::{BackendFuture, CommandBackend, ProcessBackend};
pub use invocation::Invocation;
pub use runner::run_process;
pub use scratch::ScratchDir;
