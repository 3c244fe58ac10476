// src/handlers/residents.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::resident::{CreateResidentPayload, Resident, ResidentQuery, UpdateResidentPayload},
};

// GET /api/residents
#[utoipa::path(
    get,
    path = "/api/residents",
    tag = "Residents",
    responses(
        (status = 200, description = "Residents of the caller's barangay", body = Vec<Resident>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Residents cannot browse the registry")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_residents(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ResidentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .resident_service
        .list_residents(&tenant.scope, &query)
        .await?;
    Ok(Json(page.into_body("residents")))
}

// GET /api/residents/{id}
#[utoipa::path(
    get,
    path = "/api/residents/{id}",
    tag = "Residents",
    params(("id" = i64, Path, description = "Resident ID")),
    responses(
        (status = 200, description = "Resident", body = Resident),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_resident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let resident = app_state.resident_service.get_resident(&tenant.scope, id).await?;
    Ok(Json(json!({ "resident": resident })))
}

// POST /api/residents
#[utoipa::path(
    post,
    path = "/api/residents",
    tag = "Residents",
    request_body = CreateResidentPayload,
    responses(
        (status = 201, description = "Resident registered", body = Resident),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Household not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_resident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateResidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let resident = app_state
        .resident_service
        .create_resident(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Resident created successfully", "resident": resident })),
    ))
}

// PUT /api/residents/{id}
#[utoipa::path(
    put,
    path = "/api/residents/{id}",
    tag = "Residents",
    params(("id" = i64, Path, description = "Resident ID")),
    request_body = UpdateResidentPayload,
    responses(
        (status = 200, description = "Resident updated", body = Resident),
        (status = 400, description = "Validation failed or illegal status change"),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_resident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateResidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let resident = app_state
        .resident_service
        .update_resident(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Resident updated successfully", "resident": resident })))
}

// DELETE /api/residents/{id}
#[utoipa::path(
    delete,
    path = "/api/residents/{id}",
    tag = "Residents",
    params(("id" = i64, Path, description = "Resident ID")),
    responses(
        (status = 200, description = "Resident marked inactive"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_resident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.resident_service.delete_resident(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Resident deleted successfully" })))
}
