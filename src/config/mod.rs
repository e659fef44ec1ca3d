// src/config/mod.rs

//! Node properties (the per-action configuration bundle).
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a properties file from disk.
//! - `validate.rs`: invariants checked before any operation runs.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    ClientConfig, Credentials, FunctionDescriptor, NodeProperties, RawNodeProperties,
    RelationshipConfig, ResourceConfig, ServerlessConfig,
};
