// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{NodeProperties, RawNodeProperties};
use crate::errors::Result;

/// Load a properties file from a given path and return the raw
/// `RawNodeProperties`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// a checked [`NodeProperties`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawNodeProperties> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let props: RawNodeProperties = toml::from_str(&contents)?;

    Ok(props)
}

/// Load a properties file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<NodeProperties> {
    let raw = load_from_path(&path)?;
    let props = NodeProperties::try_from(raw)?;
    Ok(props)
}
