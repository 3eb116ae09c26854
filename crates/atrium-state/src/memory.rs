use std::{collections::HashMap, marker::PhantomData};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::repository::{Repository, RepositoryError, RepositoryItem};

/// In-memory repository for tests and embedders that opt out of persistence.
/// Items round-trip through JSON exactly like the durable backends, so a type
/// that works here also persists correctly.
pub struct MemoryRepository<V: RepositoryItem> {
    items: Mutex<HashMap<String, Value>>,
    _marker: PhantomData<fn() -> V>,
}

impl<V: RepositoryItem> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            _marker: PhantomData,
        }
    }
}

impl<V: RepositoryItem> MemoryRepository<V> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl<V: RepositoryItem> Repository<V> for MemoryRepository<V> {
    async fn get(&self, key: String) -> Result<Option<V>, RepositoryError> {
        match self.items.lock().await.get(&key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<V>, RepositoryError> {
        self.items
            .lock()
            .await
            .values()
            .map(|value| Ok(serde_json::from_value(value.clone())?))
            .collect()
    }

    async fn set(&self, key: String, value: V) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(&value)?;
        self.items.lock().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: String) -> Result<(), RepositoryError> {
        self.items.lock().await.remove(&key);
        Ok(())
    }
}
