//! Snapshot cache for resolved role permissions.
//!
//! The cache sits in front of the authoritative role store and only ever
//! serves reads while authoritative data is unavailable. Entries expire
//! lazily on read; nothing here schedules timers or retries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staffhub_core::AppResult;
use staffhub_domain::PermissionSet;
use tracing::warn;

/// Base key under which permission snapshots are persisted. One server
/// process serves many principals, so entries are namespaced per subject.
pub const PERMISSION_CACHE_KEY: &str = "employee_permissions_cache";

/// Snapshot lifetime before a read discards it.
pub const PERMISSION_CACHE_TTL_MILLIS: i64 = 5 * 60 * 1000;

/// Key-value persistence capability used by the cache.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores `value` under `key`, overwriting any prior value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes the value stored under `key`, if any.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Wall-clock capability; expiry is a passive timestamp comparison.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Last known permissions for one subject. Ephemeral and never
/// authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPermissionSnapshot {
    /// Permission document at snapshot time.
    pub permissions: PermissionSet,
    /// Role name at snapshot time.
    pub user_role: String,
    /// Snapshot creation time, epoch milliseconds.
    pub timestamp: i64,
    /// Lifetime in milliseconds.
    pub expires_in: i64,
}

/// Authoritative permission state supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    /// Resolved permission document, if loading finished.
    pub permissions: Option<PermissionSet>,
    /// Resolved role name, if loading finished.
    pub user_role: Option<String>,
    /// The authoritative source has not produced a result yet.
    pub is_loading: bool,
}

/// Permission state after the cache has been consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAuth {
    /// Effective permission document, if any.
    pub permissions: Option<PermissionSet>,
    /// Effective role name, if any.
    pub user_role: Option<String>,
    /// The pair was served from a cached snapshot.
    pub from_cache: bool,
    /// Neither authoritative data nor a valid snapshot was available.
    pub is_loading: bool,
}

/// Time-boxed cache of the last resolved `(permissions, role)` pair.
#[derive(Clone)]
pub struct PermissionCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl PermissionCache {
    /// Creates a cache over the given store and clock.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the subject's snapshot while it is still valid.
    ///
    /// Expired and malformed entries are deleted from the store and
    /// treated as absent. Store failures are logged and treated as
    /// absent. Never errors.
    pub async fn get(&self, subject: &str) -> Option<CachedPermissionSnapshot> {
        let key = cache_key(subject);

        let raw = match self.store.get(&key).await {
            Ok(value) => value?,
            Err(error) => {
                warn!(%error, "failed to read permission cache entry");
                return None;
            }
        };

        let Ok(snapshot) = serde_json::from_str::<CachedPermissionSnapshot>(&raw) else {
            self.discard(&key, "malformed").await;
            return None;
        };

        let age = self.clock.now().timestamp_millis() - snapshot.timestamp;
        if age >= snapshot.expires_in {
            self.discard(&key, "expired").await;
            return None;
        }

        Some(snapshot)
    }

    /// Persists a fresh snapshot for the subject, overwriting any prior
    /// entry regardless of its state.
    ///
    /// Persistence failures are logged and swallowed; they never block
    /// the caller.
    pub async fn store(&self, subject: &str, permissions: &PermissionSet, user_role: &str) {
        let snapshot = CachedPermissionSnapshot {
            permissions: permissions.clone(),
            user_role: user_role.to_owned(),
            timestamp: self.clock.now().timestamp_millis(),
            expires_in: PERMISSION_CACHE_TTL_MILLIS,
        };

        let encoded = match serde_json::to_string(&snapshot) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(%error, "failed to encode permission cache entry");
                return;
            }
        };

        if let Err(error) = self.store.set(&cache_key(subject), &encoded).await {
            warn!(%error, "failed to persist permission cache entry");
        }
    }

    /// Removes the subject's snapshot.
    pub async fn clear(&self, subject: &str) {
        self.discard(&cache_key(subject), "cleared").await;
    }

    /// Substitutes a valid snapshot while the authoritative source is
    /// loading; authoritative data always wins once present and is
    /// written back whenever both halves are available.
    pub async fn resolve(&self, subject: &str, state: AuthState) -> ResolvedAuth {
        if state.is_loading {
            if let Some(snapshot) = self.get(subject).await {
                return ResolvedAuth {
                    permissions: Some(snapshot.permissions),
                    user_role: Some(snapshot.user_role),
                    from_cache: true,
                    is_loading: false,
                };
            }

            return ResolvedAuth {
                permissions: None,
                user_role: None,
                from_cache: false,
                is_loading: true,
            };
        }

        if let (Some(permissions), Some(user_role)) = (&state.permissions, &state.user_role) {
            self.store(subject, permissions, user_role).await;
        }

        ResolvedAuth {
            permissions: state.permissions,
            user_role: state.user_role,
            from_cache: false,
            is_loading: false,
        }
    }

    async fn discard(&self, key: &str, reason: &str) {
        if let Err(error) = self.store.delete(key).await {
            warn!(%error, reason, "failed to delete permission cache entry");
        }
    }
}

fn cache_key(subject: &str) -> String {
    format!("{PERMISSION_CACHE_KEY}:{subject}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use staffhub_domain::PermissionSet;

    use crate::test_support::{FakeClock, FakeKeyValueStore};

    use super::{AuthState, PERMISSION_CACHE_TTL_MILLIS, PermissionCache, cache_key};

    fn granted_permissions() -> PermissionSet {
        PermissionSet::from_value(&json!({
            "employeeManagement": { "list": { "view": true } }
        }))
    }

    #[tokio::test]
    async fn round_trip_returns_stored_pair() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock);

        let permissions = granted_permissions();
        cache.store("subject-1", &permissions, "HR").await;

        let snapshot = cache.get("subject-1").await;
        assert!(snapshot.is_some_and(|snapshot| {
            snapshot.user_role == "HR" && snapshot.permissions == permissions
        }));
    }

    #[tokio::test]
    async fn expired_entry_is_removed_not_just_hidden() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store.clone(), clock.clone());

        cache.store("subject-1", &granted_permissions(), "HR").await;
        clock.advance(PERMISSION_CACHE_TTL_MILLIS + 1);

        assert!(cache.get("subject-1").await.is_none());

        // The persisted entry is gone, so a second read stays empty even
        // if the clock were wound back.
        let persisted = store.entries.lock().await.clone();
        assert!(persisted.is_empty());
        assert!(cache.get("subject-1").await.is_none());
    }

    #[tokio::test]
    async fn entry_just_under_ttl_is_still_served() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock.clone());

        cache.store("subject-1", &granted_permissions(), "HR").await;
        clock.advance(PERMISSION_CACHE_TTL_MILLIS - 1);

        assert!(cache.get("subject-1").await.is_some());
    }

    #[tokio::test]
    async fn malformed_entry_is_discarded_silently() {
        let store = Arc::new(FakeKeyValueStore::default());
        store
            .entries
            .lock()
            .await
            .insert(cache_key("subject-1"), "{not json".to_owned());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store.clone(), clock);

        assert!(cache.get("subject-1").await.is_none());
        assert!(store.entries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn write_failures_do_not_propagate() {
        let store = Arc::new(FakeKeyValueStore {
            fail_writes: true,
            ..FakeKeyValueStore::default()
        });
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock);

        // Must not panic or error; the caller flow is unaffected.
        cache.store("subject-1", &granted_permissions(), "HR").await;
        assert!(cache.get("subject-1").await.is_none());
    }

    #[tokio::test]
    async fn clear_removes_valid_entry() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock);

        cache.store("subject-1", &granted_permissions(), "HR").await;
        cache.clear("subject-1").await;

        assert!(cache.get("subject-1").await.is_none());
    }

    #[tokio::test]
    async fn loading_state_is_served_from_valid_snapshot() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock);

        cache.store("subject-1", &granted_permissions(), "HR").await;

        let resolved = cache
            .resolve(
                "subject-1",
                AuthState {
                    permissions: None,
                    user_role: None,
                    is_loading: true,
                },
            )
            .await;

        assert!(resolved.from_cache);
        assert!(!resolved.is_loading);
        assert_eq!(resolved.user_role.as_deref(), Some("HR"));
    }

    #[tokio::test]
    async fn loading_state_without_snapshot_stays_loading() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock);

        let resolved = cache
            .resolve(
                "subject-1",
                AuthState {
                    permissions: None,
                    user_role: None,
                    is_loading: true,
                },
            )
            .await;

        assert!(resolved.is_loading);
        assert!(resolved.permissions.is_none());
    }

    #[tokio::test]
    async fn authoritative_data_wins_over_valid_snapshot() {
        let store = Arc::new(FakeKeyValueStore::default());
        let clock = Arc::new(FakeClock::starting_at(1_000));
        let cache = PermissionCache::new(store, clock);

        cache.store("subject-1", &granted_permissions(), "HR").await;

        let resolved = cache
            .resolve(
                "subject-1",
                AuthState {
                    permissions: Some(PermissionSet::default()),
                    user_role: Some("Viewer".to_owned()),
                    is_loading: false,
                },
            )
            .await;

        assert!(!resolved.from_cache);
        assert_eq!(resolved.user_role.as_deref(), Some("Viewer"));

        // The authoritative pair also refreshed the snapshot.
        let snapshot = cache.get("subject-1").await;
        assert!(snapshot.is_some_and(|snapshot| snapshot.user_role == "Viewer"));
    }
}
