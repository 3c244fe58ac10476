// src/handlers/tenancy.rs

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
    models::tenancy::{Barangay, BarangayQuery, BarangaySummary, CreateBarangayPayload, UpdateBarangayPayload},
};

// GET /api/barangays/public
#[utoipa::path(
    get,
    path = "/api/barangays/public",
    tag = "Barangays",
    responses(
        (status = 200, description = "Active barangays for the registration form", body = Vec<BarangaySummary>)
    )
)]
pub async fn list_public_barangays(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let barangays = app_state.barangay_service.list_public().await?;
    Ok(Json(json!({ "barangays": barangays })))
}

// GET /api/barangays
#[utoipa::path(
    get,
    path = "/api/barangays",
    tag = "Barangays",
    responses(
        (status = 200, description = "Barangays visible to the caller", body = Vec<Barangay>),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_barangays(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<BarangayQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.barangay_service.list(&tenant.scope, &query).await?;
    Ok(Json(page.into_body("barangays")))
}

// GET /api/barangays/{id}
#[utoipa::path(
    get,
    path = "/api/barangays/{id}",
    tag = "Barangays",
    params(("id" = i64, Path, description = "Barangay ID")),
    responses(
        (status = 200, description = "Barangay", body = Barangay),
        (status = 404, description = "Barangay not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_barangay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let barangay = app_state.barangay_service.get(&tenant.scope, id).await?;
    Ok(Json(json!({ "barangay": barangay })))
}

// POST /api/barangays
#[utoipa::path(
    post,
    path = "/api/barangays",
    tag = "Barangays",
    request_body = CreateBarangayPayload,
    responses(
        (status = 201, description = "Barangay created", body = Barangay),
        (status = 400, description = "Validation failed or duplicate barangay"),
        (status = 403, description = "Super admins only")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_barangay(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateBarangayPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let barangay = app_state.barangay_service.create(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Barangay created successfully", "barangay": barangay })),
    ))
}

// PUT /api/barangays/{id}
#[utoipa::path(
    put,
    path = "/api/barangays/{id}",
    tag = "Barangays",
    params(("id" = i64, Path, description = "Barangay ID")),
    request_body = UpdateBarangayPayload,
    responses(
        (status = 200, description = "Barangay updated", body = Barangay),
        (status = 403, description = "Only super admins change a barangay's status"),
        (status = 404, description = "Barangay not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_barangay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBarangayPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let barangay = app_state
        .barangay_service
        .update(&tenant.principal, &tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Barangay updated successfully", "barangay": barangay })))
}

// DELETE /api/barangays/{id}
#[utoipa::path(
    delete,
    path = "/api/barangays/{id}",
    tag = "Barangays",
    params(("id" = i64, Path, description = "Barangay ID")),
    responses(
        (status = 200, description = "Barangay and all of its records deleted"),
        (status = 404, description = "Barangay not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_barangay(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.barangay_service.delete(id).await?;
    Ok(Json(json!({ "message": "Barangay deleted successfully" })))
}
