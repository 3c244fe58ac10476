// src/handlers/incidents.rs

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
    models::incident::{CreateIncidentPayload, Incident, IncidentQuery, UpdateIncidentPayload},
};

// GET /api/incidents
#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "Incidents",
    responses((status = 200, description = "Blotter entries", body = Vec<Incident>)),
    security(("api_jwt" = []))
)]
pub async fn list_incidents(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<IncidentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.incident_service.list(&tenant.scope, &query).await?;
    Ok(Json(page.into_body("incidents")))
}

// GET /api/incidents/{id}
#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = i64, Path, description = "Incident ID")),
    responses(
        (status = 200, description = "Blotter entry", body = Incident),
        (status = 404, description = "Incident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_incident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let incident = app_state.incident_service.get(&tenant.scope, id).await?;
    Ok(Json(json!({ "incident": incident })))
}

// POST /api/incidents
#[utoipa::path(
    post,
    path = "/api/incidents",
    tag = "Incidents",
    request_body = CreateIncidentPayload,
    responses(
        (status = 201, description = "Incident recorded under a new BLT number", body = Incident),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_incident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let incident = app_state
        .incident_service
        .create(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Incident recorded successfully", "incident": incident })),
    ))
}

// PUT /api/incidents/{id}
#[utoipa::path(
    put,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = i64, Path, description = "Incident ID")),
    request_body = UpdateIncidentPayload,
    responses(
        (status = 200, description = "Incident updated", body = Incident),
        (status = 400, description = "Illegal status change"),
        (status = 404, description = "Incident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_incident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let incident = app_state
        .incident_service
        .update(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Incident updated successfully", "incident": incident })))
}

// DELETE /api/incidents/{id}
#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = i64, Path, description = "Incident ID")),
    responses(
        (status = 200, description = "Incident archived"),
        (status = 404, description = "Incident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_incident(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.incident_service.delete(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Incident deleted successfully" })))
}
