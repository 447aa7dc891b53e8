// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { contents: Vec<u8>, executable: bool },
    Dir,
}

/// In-memory filesystem for tests.
///
/// Parent directories are created implicitly when a file is added, the same
/// way `RealFileSystem::write` does.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.lock().insert(PathBuf::from("."), MockEntry::Dir);
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.lock();
        if let Some(parent) = path.parent() {
            ensure_dirs(&mut entries, parent);
        }
        entries.insert(
            path,
            MockEntry::File {
                contents: content.into(),
                executable: false,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        ensure_dirs(&mut entries, path.as_ref());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.lock().remove(path.as_ref());
    }

    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        matches!(
            self.lock().get(path.as_ref()),
            Some(MockEntry::File { executable: true, .. })
        )
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A panic while holding the lock leaves the map consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn ensure_dirs(entries: &mut HashMap<PathBuf, MockEntry>, dir: &Path) {
    let mut current = Some(dir);
    while let Some(path) = current {
        let path = if path.as_os_str().is_empty() {
            Path::new(".")
        } else {
            path
        };
        if entries.contains_key(path) {
            break;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir);
        current = path.parent();
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::File { contents, .. }) => {
                String::from_utf8(contents.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if matches!(self.lock().get(path), Some(MockEntry::Dir)) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if matches!(self.lock().get(path), Some(MockEntry::File { .. })) {
            return Err(anyhow!("Not a directory: {:?}", path));
        }
        self.add_dir(path);
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> Result<()> {
        match self.lock().get_mut(path) {
            Some(MockEntry::File { executable, .. }) => {
                *executable = true;
                Ok(())
            }
            _ => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
