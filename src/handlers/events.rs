// src/handlers/events.rs

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
    models::event::{CreateEventPayload, Event, EventQuery, UpdateEventPayload},
};

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses((status = 200, description = "Community events", body = Vec<Event>)),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<EventQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .community_service
        .list_events(&tenant.principal, &tenant.scope, query)
        .await?;
    Ok(Json(page.into_body("events")))
}

// GET /api/events/{id}
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 404, description = "Event not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state
        .community_service
        .get_event(&tenant.principal, &tenant.scope, id)
        .await?;
    Ok(Json(json!({ "event": event })))
}

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Event scheduled", body = Event),
        (status = 400, description = "Validation failed")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let event = app_state
        .community_service
        .create_event(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Event created successfully", "event": event })),
    ))
}

// PUT /api/events/{id}
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "Event ID")),
    request_body = UpdateEventPayload,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Validation failed or illegal status change"),
        (status = 404, description = "Event not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let event = app_state
        .community_service
        .update_event(&tenant.principal, &tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Event updated successfully", "event": event })))
}

// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event cancelled"),
        (status = 404, description = "Event not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.community_service.delete_event(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}
