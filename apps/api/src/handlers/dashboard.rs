use axum::Json;
use axum::extract::{Extension, State};
use staffhub_core::UserIdentity;

use crate::dto::DashboardSummaryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<DashboardSummaryResponse>> {
    let summary = state.dashboard_service.summary(&user).await?;

    Ok(Json(DashboardSummaryResponse::from(summary)))
}
