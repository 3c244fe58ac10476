// src/handlers/permits.rs

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
    models::permit::{
        CreatePermitPayload, Permit, PermitQuery, UpdatePermitPayload, UpdatePermitStatusPayload,
    },
};

// GET /api/permits
#[utoipa::path(
    get,
    path = "/api/permits",
    tag = "Permits",
    responses((status = 200, description = "Business permits", body = Vec<Permit>)),
    security(("api_jwt" = []))
)]
pub async fn list_permits(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<PermitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .business_service
        .list_permits(&tenant.scope, &query)
        .await?;
    Ok(Json(page.into_body("permits")))
}

// GET /api/permits/{id}
#[utoipa::path(
    get,
    path = "/api/permits/{id}",
    tag = "Permits",
    params(("id" = i64, Path, description = "Permit ID")),
    responses(
        (status = 200, description = "Permit", body = Permit),
        (status = 404, description = "Permit not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_permit(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let permit = app_state.business_service.get_permit(&tenant.scope, id).await?;
    Ok(Json(json!({ "permit": permit })))
}

// POST /api/permits
#[utoipa::path(
    post,
    path = "/api/permits",
    tag = "Permits",
    request_body = CreatePermitPayload,
    responses(
        (status = 201, description = "Permit application filed under a new BP number", body = Permit),
        (status = 400, description = "Validation failed or business closed"),
        (status = 404, description = "Business not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_permit(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreatePermitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let permit = app_state
        .business_service
        .create_permit(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Permit created successfully", "permit": permit })),
    ))
}

// PUT /api/permits/{id}
#[utoipa::path(
    put,
    path = "/api/permits/{id}",
    tag = "Permits",
    params(("id" = i64, Path, description = "Permit ID")),
    request_body = UpdatePermitPayload,
    responses(
        (status = 200, description = "Permit updated", body = Permit),
        (status = 400, description = "Permit no longer pending"),
        (status = 404, description = "Permit not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_permit(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePermitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let permit = app_state
        .business_service
        .update_permit(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Permit updated successfully", "permit": permit })))
}

// PATCH /api/permits/{id}/status
#[utoipa::path(
    patch,
    path = "/api/permits/{id}/status",
    tag = "Permits",
    params(("id" = i64, Path, description = "Permit ID")),
    request_body = UpdatePermitStatusPayload,
    responses(
        (status = 200, description = "Permit status changed", body = Permit),
        (status = 400, description = "Illegal status change"),
        (status = 403, description = "Treasurer, captain or admin only"),
        (status = 404, description = "Permit not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_permit_status(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePermitStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let permit = app_state
        .business_service
        .update_permit_status(&tenant.principal, &tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Permit status updated", "permit": permit })))
}

// DELETE /api/permits/{id}
#[utoipa::path(
    delete,
    path = "/api/permits/{id}",
    tag = "Permits",
    params(("id" = i64, Path, description = "Permit ID")),
    responses(
        (status = 200, description = "Permit revoked"),
        (status = 404, description = "Permit not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_permit(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.business_service.delete_permit(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Permit deleted successfully" })))
}
