//! JSON-file backed key-value store

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use tflens_core::prelude::*;

use super::KvStore;

/// Key-value store persisted as one JSON object of strings.
///
/// The whole map is loaded on open and rewritten on every write
/// (temp file + rename). Concurrent viewers are last-writer-wins.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileKvStore {
    /// Open the store at `path`. A missing or unreadable file yields an
    /// empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => {
                    debug!("Loaded {} state keys from {:?}", values.len(), path);
                    values
                }
                Err(e) => {
                    warn!("Ignoring unreadable state file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read state file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn persist(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::store(format!("Failed to create state dir: {}", e)))?;

        let content =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize state")?;

        // Serialize writers from other tflens processes
        let lock_path = dir.join(".state.lock");
        let lock = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::store(format!("Failed to open state lock: {}", e)))?;
        lock.lock_exclusive()
            .map_err(|e| Error::store(format!("Failed to lock state: {}", e)))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        let temp_path = dir.join(format!(".{file_name}.tmp"));

        let result = (|| -> Result<()> {
            let mut file = std::fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
            std::fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        let _ = lock.unlock();
        result.with_context(|| format!("Failed to write {:?}", self.path))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
