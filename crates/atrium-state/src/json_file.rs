use std::{
    collections::BTreeMap,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::repository::{Repository, RepositoryError, RepositoryItem};

/// File-backed repository holding the items of one registered type as a
/// single JSON object (`key -> item`) at `<dir>/<NAME>.json`.
///
/// The file is rewritten whole on each mutation; records stored through this
/// backend are expected to be small. An absent file is an empty repository,
/// not an error.
pub struct JsonFileRepository<V: RepositoryItem> {
    path: PathBuf,
    // Serializes file access so a read never observes a half-written file.
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> V>,
}

impl<V: RepositoryItem> JsonFileRepository<V> {
    /// Creates a repository storing its records under `dir`. The directory
    /// must exist; the file is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", V::NAME)),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    fn read_records(&self) -> Result<BTreeMap<String, Value>, RepositoryError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_records(&self, records: &BTreeMap<String, Value>) -> Result<(), RepositoryError> {
        let contents = serde_json::to_string(records)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<V: RepositoryItem> Repository<V> for JsonFileRepository<V> {
    async fn get(&self, key: String) -> Result<Option<V>, RepositoryError> {
        let _guard = self.lock.lock().await;
        match self.read_records()?.remove(&key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<V>, RepositoryError> {
        let _guard = self.lock.lock().await;
        self.read_records()?
            .into_values()
            .map(|value| Ok(serde_json::from_value(value)?))
            .collect()
    }

    async fn set(&self, key: String, value: V) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records()?;
        records.insert(key, serde_json::to_value(&value)?);
        self.write_records(&records)
    }

    async fn remove(&self, key: String) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records()?;
        if records.remove(&key).is_some() {
            self.write_records(&records)?;
        }
        Ok(())
    }
}
