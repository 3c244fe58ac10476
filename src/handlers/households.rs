// src/handlers/households.rs

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
    models::household::{
        CreateHouseholdPayload, Household, HouseholdDetail, HouseholdQuery, UpdateHouseholdPayload,
    },
};

// GET /api/households
#[utoipa::path(
    get,
    path = "/api/households",
    tag = "Households",
    responses((status = 200, description = "Households", body = Vec<Household>)),
    security(("api_jwt" = []))
)]
pub async fn list_households(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<HouseholdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .resident_service
        .list_households(&tenant.scope, &query)
        .await?;
    Ok(Json(page.into_body("households")))
}

// GET /api/households/{id}
#[utoipa::path(
    get,
    path = "/api/households/{id}",
    tag = "Households",
    params(("id" = i64, Path, description = "Household ID")),
    responses(
        (status = 200, description = "Household with its members", body = HouseholdDetail),
        (status = 404, description = "Household not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_household(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let household = app_state.resident_service.get_household(&tenant.scope, id).await?;
    Ok(Json(json!({ "household": household })))
}

// POST /api/households
#[utoipa::path(
    post,
    path = "/api/households",
    tag = "Households",
    request_body = CreateHouseholdPayload,
    responses(
        (status = 201, description = "Household created", body = Household),
        (status = 400, description = "Validation failed or household number taken"),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_household(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateHouseholdPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let household = app_state
        .resident_service
        .create_household(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Household created successfully", "household": household })),
    ))
}

// PUT /api/households/{id}
#[utoipa::path(
    put,
    path = "/api/households/{id}",
    tag = "Households",
    params(("id" = i64, Path, description = "Household ID")),
    request_body = UpdateHouseholdPayload,
    responses(
        (status = 200, description = "Household updated", body = Household),
        (status = 404, description = "Household not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_household(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateHouseholdPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let household = app_state
        .resident_service
        .update_household(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Household updated successfully", "household": household })))
}

// DELETE /api/households/{id}
#[utoipa::path(
    delete,
    path = "/api/households/{id}",
    tag = "Households",
    params(("id" = i64, Path, description = "Household ID")),
    responses(
        (status = 200, description = "Household deleted, members detached"),
        (status = 404, description = "Household not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_household(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.resident_service.delete_household(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Household deleted successfully" })))
}
