// src/handlers/officials.rs

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
    models::official::{CreateOfficialPayload, Official, OfficialQuery, UpdateOfficialPayload},
};

// GET /api/officials
#[utoipa::path(
    get,
    path = "/api/officials",
    tag = "Officials",
    responses((status = 200, description = "Barangay officials", body = Vec<Official>)),
    security(("api_jwt" = []))
)]
pub async fn list_officials(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<OfficialQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .community_service
        .list_officials(&tenant.scope, &query)
        .await?;
    Ok(Json(page.into_body("officials")))
}

// GET /api/officials/{id}
#[utoipa::path(
    get,
    path = "/api/officials/{id}",
    tag = "Officials",
    params(("id" = i64, Path, description = "Official ID")),
    responses(
        (status = 200, description = "Official", body = Official),
        (status = 404, description = "Official not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_official(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let official = app_state.community_service.get_official(&tenant.scope, id).await?;
    Ok(Json(json!({ "official": official })))
}

// POST /api/officials
#[utoipa::path(
    post,
    path = "/api/officials",
    tag = "Officials",
    request_body = CreateOfficialPayload,
    responses(
        (status = 201, description = "Official added", body = Official),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_official(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateOfficialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let official = app_state
        .community_service
        .create_official(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Official created successfully", "official": official })),
    ))
}

// PUT /api/officials/{id}
#[utoipa::path(
    put,
    path = "/api/officials/{id}",
    tag = "Officials",
    params(("id" = i64, Path, description = "Official ID")),
    request_body = UpdateOfficialPayload,
    responses(
        (status = 200, description = "Official updated", body = Official),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Official not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_official(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOfficialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let official = app_state
        .community_service
        .update_official(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Official updated successfully", "official": official })))
}

// DELETE /api/officials/{id}
#[utoipa::path(
    delete,
    path = "/api/officials/{id}",
    tag = "Officials",
    params(("id" = i64, Path, description = "Official ID")),
    responses(
        (status = 200, description = "Official marked inactive"),
        (status = 404, description = "Official not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_official(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.community_service.delete_official(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Official deleted successfully" })))
}
