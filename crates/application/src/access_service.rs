use std::sync::Arc;

use staffhub_core::UserIdentity;
use tracing::warn;

use crate::permission_cache::{AuthState, PermissionCache, ResolvedAuth};
use crate::role_ports::RoleRepository;

/// Resolves effective permissions for an authenticated session.
///
/// The role store is authoritative. A store failure is the server analog
/// of the loading state: the snapshot cache substitutes the last known
/// pair so the caller is not blocked while the store is unreachable; a
/// successful load always wins and refreshes the snapshot.
#[derive(Clone)]
pub struct AccessService {
    roles: Arc<dyn RoleRepository>,
    cache: PermissionCache,
}

impl AccessService {
    /// Creates an access service over the role repository and cache.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleRepository>, cache: PermissionCache) -> Self {
        Self { roles, cache }
    }

    /// Resolves the effective `(permissions, role)` pair for the session.
    ///
    /// Fail-closed: when neither the store nor a valid snapshot yields a
    /// document, the result carries no permissions and every downstream
    /// check denies.
    pub async fn resolve_for(&self, identity: &UserIdentity) -> ResolvedAuth {
        let state = match self.roles.find_permissions_by_name(identity.role()).await {
            Ok(permissions) => AuthState {
                permissions,
                user_role: Some(identity.role().to_owned()),
                is_loading: false,
            },
            Err(error) => {
                warn!(%error, role = identity.role(), "role permission load failed, consulting cache");
                AuthState {
                    permissions: None,
                    user_role: None,
                    is_loading: true,
                }
            }
        };

        self.cache.resolve(identity.subject(), state).await
    }

    /// Drops the session's cached snapshot, e.g. on logout.
    pub async fn forget(&self, subject: &str) {
        self.cache.clear(subject).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use staffhub_core::{AppError, AppResult, UserIdentity};
    use staffhub_domain::{PermissionSet, Role, RoleId};

    use crate::permission_cache::{AuthState, PermissionCache};
    use crate::role_ports::{NewRole, RolePermissionDocument, RoleRepository};
    use crate::test_support::{FakeClock, FakeKeyValueStore};

    use super::AccessService;

    struct FakeRoleRepository {
        permissions: Option<PermissionSet>,
        fail: bool,
    }

    #[async_trait]
    impl RoleRepository for FakeRoleRepository {
        async fn list_roles(&self) -> AppResult<Vec<Role>> {
            Ok(Vec::new())
        }

        async fn create_role(&self, _role: NewRole) -> AppResult<Role> {
            Err(AppError::Internal("not used".to_owned()))
        }

        async fn find_permissions_by_name(&self, _name: &str) -> AppResult<Option<PermissionSet>> {
            if self.fail {
                return Err(AppError::Internal("role store unavailable".to_owned()));
            }

            Ok(self.permissions.clone())
        }

        async fn count_active(&self) -> AppResult<i64> {
            Ok(0)
        }

        async fn list_permission_documents(&self) -> AppResult<Vec<RolePermissionDocument>> {
            Ok(Vec::new())
        }

        async fn save_permission_document(
            &self,
            _role_id: RoleId,
            _permissions: &Value,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn identity() -> UserIdentity {
        UserIdentity::new("subject-1", "Ama Mensah", "ama@staffhub.example", "HR")
    }

    fn cache() -> PermissionCache {
        PermissionCache::new(
            Arc::new(FakeKeyValueStore::default()),
            Arc::new(FakeClock::starting_at(1_000)),
        )
    }

    #[tokio::test]
    async fn successful_load_is_authoritative_and_cached() {
        let permissions = PermissionSet::from_value(&json!({
            "employeeManagement": { "list": { "view": true } }
        }));
        let service = AccessService::new(
            Arc::new(FakeRoleRepository {
                permissions: Some(permissions.clone()),
                fail: false,
            }),
            cache(),
        );

        let resolved = service.resolve_for(&identity()).await;
        assert!(!resolved.from_cache);
        assert_eq!(resolved.permissions, Some(permissions));
        assert_eq!(resolved.user_role.as_deref(), Some("HR"));
    }

    #[tokio::test]
    async fn store_failure_falls_back_to_snapshot() {
        let shared_cache = cache();
        shared_cache
            .resolve(
                "subject-1",
                AuthState {
                    permissions: Some(PermissionSet::default()),
                    user_role: Some("HR".to_owned()),
                    is_loading: false,
                },
            )
            .await;

        let service = AccessService::new(
            Arc::new(FakeRoleRepository {
                permissions: None,
                fail: true,
            }),
            shared_cache,
        );

        let resolved = service.resolve_for(&identity()).await;
        assert!(resolved.from_cache);
        assert_eq!(resolved.user_role.as_deref(), Some("HR"));
    }

    #[tokio::test]
    async fn store_failure_without_snapshot_denies() {
        let service = AccessService::new(
            Arc::new(FakeRoleRepository {
                permissions: None,
                fail: true,
            }),
            cache(),
        );

        let resolved = service.resolve_for(&identity()).await;
        assert!(resolved.is_loading);
        assert!(resolved.permissions.is_none());
    }

    #[tokio::test]
    async fn unknown_role_yields_no_permissions() {
        let service = AccessService::new(
            Arc::new(FakeRoleRepository {
                permissions: None,
                fail: false,
            }),
            cache(),
        );

        let resolved = service.resolve_for(&identity()).await;
        assert!(!resolved.is_loading);
        assert!(resolved.permissions.is_none());
        assert_eq!(resolved.user_role.as_deref(), Some("HR"));
    }
}
