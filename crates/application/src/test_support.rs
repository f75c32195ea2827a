//! Shared fakes for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use staffhub_core::{AppError, AppResult};
use tokio::sync::Mutex;

use crate::permission_cache::{Clock, KeyValueStore};

/// In-memory key-value fake; set `fail_writes` to simulate quota errors.
#[derive(Default)]
pub struct FakeKeyValueStore {
    pub entries: Mutex<HashMap<String, String>>,
    pub fail_writes: bool,
}

#[async_trait]
impl KeyValueStore for FakeKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::Internal("store quota exceeded".to_owned()));
        }

        self.entries
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Manually advanced clock for expiry tests.
pub struct FakeClock {
    millis: AtomicI64,
}

impl FakeClock {
    pub fn starting_at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst))
            .single()
            .unwrap_or_default()
    }
}
