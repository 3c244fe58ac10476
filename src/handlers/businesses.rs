// src/handlers/businesses.rs

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
    models::business::{Business, BusinessQuery, CreateBusinessPayload, UpdateBusinessPayload},
};

// GET /api/businesses
#[utoipa::path(
    get,
    path = "/api/businesses",
    tag = "Businesses",
    responses((status = 200, description = "Registered businesses", body = Vec<Business>)),
    security(("api_jwt" = []))
)]
pub async fn list_businesses(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<BusinessQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .business_service
        .list_businesses(&tenant.scope, &query)
        .await?;
    Ok(Json(page.into_body("businesses")))
}

// GET /api/businesses/{id}
#[utoipa::path(
    get,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = i64, Path, description = "Business ID")),
    responses(
        (status = 200, description = "Business", body = Business),
        (status = 404, description = "Business not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_business(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let business = app_state.business_service.get_business(&tenant.scope, id).await?;
    Ok(Json(json!({ "business": business })))
}

// POST /api/businesses
#[utoipa::path(
    post,
    path = "/api/businesses",
    tag = "Businesses",
    request_body = CreateBusinessPayload,
    responses(
        (status = 201, description = "Business registered", body = Business),
        (status = 400, description = "Validation failed or name already registered")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_business(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateBusinessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let business = app_state
        .business_service
        .create_business(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Business created successfully", "business": business })),
    ))
}

// PUT /api/businesses/{id}
#[utoipa::path(
    put,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = i64, Path, description = "Business ID")),
    request_body = UpdateBusinessPayload,
    responses(
        (status = 200, description = "Business updated", body = Business),
        (status = 404, description = "Business not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_business(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBusinessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let business = app_state
        .business_service
        .update_business(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Business updated successfully", "business": business })))
}

// DELETE /api/businesses/{id}
#[utoipa::path(
    delete,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = i64, Path, description = "Business ID")),
    responses(
        (status = 200, description = "Business closed"),
        (status = 404, description = "Business not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_business(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.business_service.delete_business(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Business deleted successfully" })))
}
