// src/handlers/announcements.rs

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
    models::announcement::{
        Announcement, AnnouncementQuery, CreateAnnouncementPayload, UpdateAnnouncementPayload,
    },
};

// GET /api/announcements
#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = "Announcements",
    responses((status = 200, description = "Announcements; residents only get published ones", body = Vec<Announcement>)),
    security(("api_jwt" = []))
)]
pub async fn list_announcements(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<AnnouncementQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .community_service
        .list_announcements(&tenant.principal, &tenant.scope, query)
        .await?;
    Ok(Json(page.into_body("announcements")))
}

// GET /api/announcements/{id}
#[utoipa::path(
    get,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    params(("id" = i64, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement", body = Announcement),
        (status = 404, description = "Announcement not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_announcement(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let announcement = app_state
        .community_service
        .get_announcement(&tenant.principal, &tenant.scope, id)
        .await?;
    Ok(Json(json!({ "announcement": announcement })))
}

// POST /api/announcements
#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "Announcements",
    request_body = CreateAnnouncementPayload,
    responses(
        (status = 201, description = "Announcement created", body = Announcement),
        (status = 400, description = "Validation failed")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_announcement(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateAnnouncementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let announcement = app_state
        .community_service
        .create_announcement(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Announcement created successfully", "announcement": announcement })),
    ))
}

// PUT /api/announcements/{id}
#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    params(("id" = i64, Path, description = "Announcement ID")),
    request_body = UpdateAnnouncementPayload,
    responses(
        (status = 200, description = "Announcement updated", body = Announcement),
        (status = 400, description = "Illegal status change"),
        (status = 404, description = "Announcement not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_announcement(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAnnouncementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let announcement = app_state
        .community_service
        .update_announcement(&tenant.principal, &tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Announcement updated successfully", "announcement": announcement })))
}

// DELETE /api/announcements/{id}
#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    params(("id" = i64, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement archived"),
        (status = 404, description = "Announcement not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_announcement(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .community_service
        .delete_announcement(&tenant.scope, id)
        .await?;
    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}
