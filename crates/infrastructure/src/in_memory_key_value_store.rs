use std::collections::HashMap;

use async_trait::async_trait;
use staffhub_application::KeyValueStore;
use staffhub_core::AppResult;
use tokio::sync::RwLock;

/// In-memory key-value adapter for single-process deployments.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use staffhub_application::KeyValueStore;

    use super::InMemoryKeyValueStore;

    #[tokio::test]
    async fn set_overwrites_and_delete_removes() {
        let store = InMemoryKeyValueStore::new();

        let first = store.set("k", "one").await;
        assert!(first.is_ok());
        let second = store.set("k", "two").await;
        assert!(second.is_ok());

        let read = store.get("k").await;
        assert!(read.is_ok_and(|value| value.as_deref() == Some("two")));

        let removed = store.delete("k").await;
        assert!(removed.is_ok());
        let read = store.get("k").await;
        assert!(read.is_ok_and(|value| value.is_none()));
    }
}
