use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use serde_json::{Map, Value};
use staffhub_application::{CreateEmployeeInput, UpdateEmployeeInput};
use staffhub_core::UserIdentity;
use staffhub_domain::EmployeeId;
use uuid::Uuid;

use crate::dto::{CreateEmployeeRequest, EmployeeListingResponse, UpdateEmployeeRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_employees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<EmployeeListingResponse>> {
    let listing = state.employee_service.list_employees(&user).await?;

    Ok(Json(EmployeeListingResponse::from(listing)))
}

pub async fn get_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Map<String, Value>>> {
    let record = state
        .employee_service
        .get_employee(&user, EmployeeId::from_uuid(id))
        .await?;

    Ok(Json(record))
}

pub async fn create_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let employee = state
        .employee_service
        .create_employee(
            &user,
            CreateEmployeeInput {
                name: payload.name,
                join_date: payload.join_date,
                gender: payload.gender,
                dob: payload.dob,
                phone_no: payload.phone_no,
                position: payload.position,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": employee.id.to_string() })),
    ))
}

pub async fn update_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> ApiResult<StatusCode> {
    state
        .employee_service
        .update_employee(
            &user,
            EmployeeId::from_uuid(id),
            UpdateEmployeeInput {
                fields: payload.fields,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .employee_service
        .delete_employee(&user, EmployeeId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
