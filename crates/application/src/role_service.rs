use std::sync::Arc;

use serde_json::{Map, Value, json};
use staffhub_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use staffhub_domain::{DEFAULT_ROLE_COLOR, Role, RoleStatus};
use tracing::info;

use crate::access_service::AccessService;
use crate::role_ports::{NewRole, RoleRepository};

/// Incoming payload for role creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission document.
    pub permissions: Value,
    /// Display color; defaulted when omitted.
    pub color: Option<String>,
    /// Lifecycle status; defaulted to active when omitted.
    pub status: Option<RoleStatus>,
}

/// Application service for role administration.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
    access: AccessService,
}

impl RoleService {
    /// Creates a role service from a repository and access resolver.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>, access: AccessService) -> Self {
        Self { repository, access }
    }

    /// Returns all roles, newest first, for role administrators.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<Role>> {
        let auth = self.access.resolve_for(actor).await;
        let allowed = auth
            .permissions
            .as_ref()
            .is_some_and(|set| set.system_management.roles.view);
        if !allowed {
            return Err(AppError::Forbidden(
                "role administration requires role view access".to_owned(),
            ));
        }

        self.repository.list_roles().await
    }

    /// Creates a role after validating the payload.
    ///
    /// A duplicate name surfaces as a conflict from the repository; no
    /// second record is written.
    pub async fn create_role(&self, actor: &UserIdentity, input: CreateRoleInput) -> AppResult<Role> {
        let auth = self.access.resolve_for(actor).await;
        let allowed = auth
            .permissions
            .as_ref()
            .is_some_and(|set| set.system_management.roles.create);
        if !allowed {
            return Err(AppError::Forbidden(
                "role administration requires role create access".to_owned(),
            ));
        }

        let name = NonEmptyString::new(input.name)
            .map_err(|_| AppError::Validation("role name is required".to_owned()))?;
        let description = NonEmptyString::new(input.description)
            .map_err(|_| AppError::Validation("role description is required".to_owned()))?;

        let is_populated_object = input
            .permissions
            .as_object()
            .is_some_and(|document| !document.is_empty());
        if !is_populated_object {
            return Err(AppError::Validation(
                "role permissions are required".to_owned(),
            ));
        }

        self.repository
            .create_role(NewRole {
                name: name.as_str().trim().to_owned(),
                description: description.into(),
                permissions: input.permissions,
                color: input
                    .color
                    .filter(|color| !color.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ROLE_COLOR.to_owned()),
                status: input.status.unwrap_or(RoleStatus::Active),
            })
            .await
    }

    /// One-off maintenance rewrite of stored dashboard permissions.
    ///
    /// Replaces bare-boolean dashboard sections with the structured
    /// shape, every flag set to the stored boolean. Field grants are
    /// deliberately left untouched; both field shapes remain supported
    /// at evaluation time. Returns the number of rewritten roles.
    pub async fn cleanup_dashboard_permissions(&self) -> AppResult<usize> {
        let documents = self.repository.list_permission_documents().await?;
        let mut rewritten = 0usize;

        for mut document in documents {
            if !rewrite_dashboard_sections(&mut document.permissions) {
                continue;
            }

            self.repository
                .save_permission_document(document.role_id, &document.permissions)
                .await?;
            rewritten += 1;
            info!(role_id = %document.role_id, "rewrote legacy dashboard permissions");
        }

        Ok(rewritten)
    }
}

const DASHBOARD_SECTION_FLAGS: &[(&str, &[&str])] = &[
    ("general", &["view"]),
    (
        "overviewCards",
        &["viewTotalEmployees", "viewNewHires", "viewActiveRoles"],
    ),
    (
        "charts",
        &["viewGenderDistribution", "viewPositionDistribution"],
    ),
    ("recentActivities", &["viewRecentActivities"]),
];

fn rewrite_dashboard_sections(document: &mut Value) -> bool {
    let Some(dashboard) = document.get_mut("dashboard") else {
        return false;
    };

    if let Some(granted) = dashboard.as_bool() {
        let mut sections = Map::new();
        for (section, flags) in DASHBOARD_SECTION_FLAGS {
            sections.insert((*section).to_owned(), structured_section(flags, granted));
        }
        *dashboard = Value::Object(sections);
        return true;
    }

    let Some(sections) = dashboard.as_object_mut() else {
        return false;
    };

    let mut changed = false;
    for (section, flags) in DASHBOARD_SECTION_FLAGS {
        if let Some(granted) = sections.get(*section).and_then(Value::as_bool) {
            sections.insert((*section).to_owned(), structured_section(flags, granted));
            changed = true;
        }
    }

    changed
}

fn structured_section(flags: &[&str], granted: bool) -> Value {
    let mut section = Map::new();
    for flag in flags {
        section.insert((*flag).to_owned(), json!(granted));
    }

    Value::Object(section)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{Value, json};
    use staffhub_core::{AppError, AppResult, UserIdentity};
    use staffhub_domain::{PermissionSet, Role, RoleId, RoleStatus};
    use tokio::sync::Mutex;

    use crate::access_service::AccessService;
    use crate::permission_cache::PermissionCache;
    use crate::role_ports::{NewRole, RolePermissionDocument, RoleRepository};
    use crate::test_support::{FakeClock, FakeKeyValueStore};

    use super::{CreateRoleInput, RoleService, rewrite_dashboard_sections};

    struct FakeRoleRepository {
        actor_permissions: Value,
        roles: Mutex<Vec<Role>>,
        documents: Mutex<Vec<RolePermissionDocument>>,
        saved: Mutex<Vec<RolePermissionDocument>>,
    }

    impl FakeRoleRepository {
        fn with_actor_permissions(actor_permissions: Value) -> Self {
            Self {
                actor_permissions,
                roles: Mutex::new(Vec::new()),
                documents: Mutex::new(Vec::new()),
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RoleRepository for FakeRoleRepository {
        async fn list_roles(&self) -> AppResult<Vec<Role>> {
            Ok(self.roles.lock().await.clone())
        }

        async fn create_role(&self, role: NewRole) -> AppResult<Role> {
            let mut roles = self.roles.lock().await;
            if roles.iter().any(|existing| existing.name == role.name) {
                return Err(AppError::Conflict(format!(
                    "role '{}' already exists",
                    role.name
                )));
            }

            let created = Role {
                id: RoleId::new(),
                name: role.name,
                description: role.description,
                permissions: PermissionSet::from_value(&role.permissions),
                color: role.color,
                status: role.status,
                user_count: 0,
                created_at: Utc::now(),
            };
            roles.push(created.clone());
            Ok(created)
        }

        async fn find_permissions_by_name(&self, _name: &str) -> AppResult<Option<PermissionSet>> {
            Ok(Some(PermissionSet::from_value(&self.actor_permissions)))
        }

        async fn count_active(&self) -> AppResult<i64> {
            Ok(self.roles.lock().await.len() as i64)
        }

        async fn list_permission_documents(&self) -> AppResult<Vec<RolePermissionDocument>> {
            Ok(self.documents.lock().await.clone())
        }

        async fn save_permission_document(
            &self,
            role_id: RoleId,
            permissions: &Value,
        ) -> AppResult<()> {
            self.saved.lock().await.push(RolePermissionDocument {
                role_id,
                permissions: permissions.clone(),
            });
            Ok(())
        }
    }

    fn admin_actor() -> UserIdentity {
        UserIdentity::new("subject-1", "Ama Mensah", "ama@staffhub.example", "HR Lead")
    }

    fn role_admin_permissions() -> Value {
        json!({ "systemManagement": { "roles": { "view": true, "create": true } } })
    }

    fn service(repository: Arc<FakeRoleRepository>) -> RoleService {
        let cache = PermissionCache::new(
            Arc::new(FakeKeyValueStore::default()),
            Arc::new(FakeClock::starting_at(1_000)),
        );
        let access = AccessService::new(repository.clone(), cache);
        RoleService::new(repository, access)
    }

    fn create_input(name: &str) -> CreateRoleInput {
        CreateRoleInput {
            name: name.to_owned(),
            description: "Handles payroll".to_owned(),
            permissions: json!({ "employeeManagement": { "list": { "view": true } } }),
            color: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_color_and_status() {
        let repository = Arc::new(FakeRoleRepository::with_actor_permissions(
            role_admin_permissions(),
        ));
        let service = service(repository);

        let role = service.create_role(&admin_actor(), create_input("Manager")).await;
        assert!(role.is_ok_and(|role| {
            role.color == staffhub_domain::DEFAULT_ROLE_COLOR && role.status == RoleStatus::Active
        }));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_without_second_record() {
        let repository = Arc::new(FakeRoleRepository::with_actor_permissions(
            role_admin_permissions(),
        ));
        let service = service(repository.clone());

        let first = service.create_role(&admin_actor(), create_input("Manager")).await;
        assert!(first.is_ok());

        let second = service.create_role(&admin_actor(), create_input("Manager")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(repository.roles.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_empty_permissions() {
        let repository = Arc::new(FakeRoleRepository::with_actor_permissions(
            role_admin_permissions(),
        ));
        let service = service(repository);

        let input = CreateRoleInput {
            permissions: json!({}),
            ..create_input("Manager")
        };
        let result = service.create_role(&admin_actor(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_requires_role_create_grant() {
        let repository = Arc::new(FakeRoleRepository::with_actor_permissions(
            json!({ "systemManagement": { "roles": { "view": true } } }),
        ));
        let service = service(repository);

        let result = service.create_role(&admin_actor(), create_input("Manager")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn cleanup_rewrites_boolean_dashboard_sections_only() {
        let repository = Arc::new(FakeRoleRepository::with_actor_permissions(
            role_admin_permissions(),
        ));
        repository
            .documents
            .lock()
            .await
            .push(RolePermissionDocument {
                role_id: RoleId::new(),
                permissions: json!({
                    "dashboard": { "overviewCards": true, "general": { "view": true } },
                    "employeeManagement": { "fields": { "name": true } }
                }),
            });
        let service = service(repository.clone());

        let rewritten = service.cleanup_dashboard_permissions().await;
        assert!(rewritten.is_ok_and(|count| count == 1));

        let saved = repository.saved.lock().await;
        let document = &saved[0].permissions;
        assert_eq!(
            document["dashboard"]["overviewCards"]["viewTotalEmployees"],
            json!(true)
        );
        // Already-structured sections and field grants stay untouched.
        assert_eq!(document["dashboard"]["general"], json!({ "view": true }));
        assert_eq!(document["employeeManagement"]["fields"]["name"], json!(true));
    }

    #[tokio::test]
    async fn cleanup_skips_structured_documents() {
        let repository = Arc::new(FakeRoleRepository::with_actor_permissions(
            role_admin_permissions(),
        ));
        repository
            .documents
            .lock()
            .await
            .push(RolePermissionDocument {
                role_id: RoleId::new(),
                permissions: json!({
                    "dashboard": { "general": { "view": false } }
                }),
            });
        let service = service(repository.clone());

        let rewritten = service.cleanup_dashboard_permissions().await;
        assert!(rewritten.is_ok_and(|count| count == 0));
        assert!(repository.saved.lock().await.is_empty());
    }

    #[test]
    fn whole_dashboard_boolean_becomes_structured() {
        let mut document = json!({ "dashboard": false });
        assert!(rewrite_dashboard_sections(&mut document));
        assert_eq!(
            document["dashboard"]["recentActivities"]["viewRecentActivities"],
            json!(false)
        );
    }
}
