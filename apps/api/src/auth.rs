use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use staffhub_application::AuthOutcome;
use staffhub_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::{LoginRequest, MeResponse, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "staffhub.user";

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let outcome = state
        .user_service
        .login(payload.email.as_str(), payload.password.as_str())
        .await?;

    let AuthOutcome::Authenticated(account) = outcome else {
        return Err(AppError::Unauthorized("invalid email or password".to_owned()).into());
    };

    let identity = UserIdentity::new(
        account.id.to_string(),
        account.display_name,
        account.email,
        account.role_name,
    );

    session
        .insert(SESSION_USER_KEY, identity.clone())
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;

    Ok(Json(UserIdentityResponse::from(identity)))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(identity) = identity {
        state.access_service.forget(identity.subject()).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<MeResponse>> {
    let auth = state.access_service.resolve_for(&identity).await;

    Ok(Json(MeResponse::from_identity_with_auth(identity, auth)))
}
