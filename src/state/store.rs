// src/state/store.rs

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::errors::{PluginError, Result};
use crate::state::InstanceRecord;

/// Read/write access to persisted instance records.
pub trait StateStore: Send + Sync + Debug {
    /// Load a record, or `None` if the instance has never been saved.
    fn load(&self, instance_id: &str) -> Result<Option<InstanceRecord>>;

    fn save(&self, record: &InstanceRecord) -> Result<()>;
}

/// One `<instance_id>.toml` file per instance under `dir`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, instance_id: &str) -> Result<PathBuf> {
        if instance_id.is_empty()
            || instance_id.contains(['/', '\\'])
            || instance_id.starts_with('.')
        {
            return Err(PluginError::ConfigError(format!(
                "invalid instance id '{instance_id}'"
            )));
        }
        Ok(self.dir.join(format!("{instance_id}.toml")))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, instance_id: &str) -> Result<Option<InstanceRecord>> {
        let path = self.record_path(instance_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading instance state {:?}", path))?;
        let record: InstanceRecord = toml::from_str(&contents)?;
        Ok(Some(record))
    }

    fn save(&self, record: &InstanceRecord) -> Result<()> {
        let path = self.record_path(&record.id)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating state dir {:?}", self.dir))?;
        let contents = toml::to_string(record)?;
        fs::write(&path, contents).with_context(|| format!("writing instance state {:?}", path))?;
        Ok(())
    }
}

/// In-memory store used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    records: Arc<Mutex<HashMap<String, InstanceRecord>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: InstanceRecord) {
        let mut records = self.records.lock().unwrap();
        records.insert(record.id.clone(), record);
    }

    pub fn get(&self, instance_id: &str) -> Option<InstanceRecord> {
        let records = self.records.lock().unwrap();
        records.get(instance_id).cloned()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, instance_id: &str) -> Result<Option<InstanceRecord>> {
        Ok(self.get(instance_id))
    }

    fn save(&self, record: &InstanceRecord) -> Result<()> {
        self.insert(record.clone());
        Ok(())
    }
}
