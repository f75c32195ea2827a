//! StaffHub API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use staffhub_application::{
    AccessService, DashboardService, EmployeeService, KeyValueStore, PermissionCache, RoleService,
    UserService,
};
use staffhub_core::AppError;
use staffhub_infrastructure::{
    Argon2PasswordHasher, InMemoryKeyValueStore, PostgresEmployeeRepository,
    PostgresRoleRepository, PostgresUserRepository, RedisKeyValueStore, SystemClock,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = env::args().nth(1);
    let migrate_only = command.as_deref() == Some("migrate");
    let cleanup_roles = command.as_deref() == Some("cleanup-roles");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");
    let dev_seed = env::var("DEV_SEED")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = build_app_state(pool.clone(), frontend_url.clone(), redis_url)?;

    if cleanup_roles {
        let rewritten = app_state
            .role_service
            .cleanup_dashboard_permissions()
            .await?;
        info!(rewritten, "dashboard permission cleanup finished");
        return Ok(());
    }

    if dev_seed {
        let admin_email = env::var("SEED_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@staffhub.local".to_owned());
        let admin_password =
            env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_owned());
        dev_seed::run(&pool, &admin_email, &admin_password).await?;
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let protected_routes = Router::new()
        .route(
            "/api/employees",
            get(handlers::employees::list_employees_handler)
                .post(handlers::employees::create_employee_handler),
        )
        .route(
            "/api/employees/{employee_id}",
            get(handlers::employees::get_employee_handler)
                .put(handlers::employees::update_employee_handler)
                .delete(handlers::employees::delete_employee_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route("/api/dashboard", get(handlers::dashboard::dashboard_handler))
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "staffhub-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))?;

    info!("staffhub-api stopped");
    Ok(())
}

fn build_app_state(
    pool: PgPool,
    frontend_url: String,
    redis_url: Option<String>,
) -> Result<AppState, AppError> {
    let role_repository = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let employee_repository = Arc::new(PostgresEmployeeRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool));

    let snapshot_store: Arc<dyn KeyValueStore> = match redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())
                .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
            Arc::new(RedisKeyValueStore::new(client, "staffhub"))
        }
        None => Arc::new(InMemoryKeyValueStore::new()),
    };

    let clock = Arc::new(SystemClock::new());
    let permission_cache = PermissionCache::new(snapshot_store, clock.clone());
    let access_service = AccessService::new(role_repository.clone(), permission_cache);

    Ok(AppState {
        user_service: UserService::new(user_repository, Arc::new(Argon2PasswordHasher::new())),
        employee_service: EmployeeService::new(
            employee_repository.clone(),
            access_service.clone(),
            clock.clone(),
        ),
        role_service: RoleService::new(role_repository.clone(), access_service.clone()),
        dashboard_service: DashboardService::new(
            employee_repository,
            role_repository,
            access_service.clone(),
            clock,
        ),
        access_service,
        frontend_url,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
