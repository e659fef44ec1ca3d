// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, executable: bool },
    Dir,
}

/// In-memory filesystem with just enough permission tracking for the
/// executable resolver.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert_file(path.as_ref(), content.into(), false);
    }

    pub fn add_executable(&self, path: impl AsRef<Path>) {
        self.insert_file(path.as_ref(), b"#!/bin/sh\n".to_vec(), true);
    }

    fn insert_file(&self, path: &Path, content: Vec<u8>, executable: bool) {
        let mut files = self.files.lock().unwrap();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                files
                    .entry(parent.to_path_buf())
                    .or_insert(MockEntry::Dir);
            }
        }
        files.insert(path.to_path_buf(), MockEntry::File { content, executable });
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let executable = self.is_executable(path);
        self.insert_file(path, contents.to_vec(), executable);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::File { .. }))
    }

    fn is_executable(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(
            files.get(path),
            Some(MockEntry::File { executable: true, .. })
        )
    }

    fn set_user_executable(&self, path: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        match files.get_mut(path) {
            Some(MockEntry::File { executable, .. }) => {
                *executable = true;
                Ok(())
            }
            _ => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let content = {
            let files = self.files.lock().unwrap();
            match files.get(from) {
                Some(MockEntry::File { content, .. }) => content.clone(),
                _ => return Err(anyhow!("File not found: {:?}", from)),
            }
        };
        self.insert_file(to, content, false);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        match files.remove(path) {
            Some(MockEntry::File { .. }) => Ok(()),
            Some(entry) => {
                files.insert(path.to_path_buf(), entry);
                Err(anyhow!("Is a directory: {:?}", path))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            files.entry(dir.to_path_buf()).or_insert(MockEntry::Dir);
            current = dir.parent();
        }
        Ok(())
    }
}
