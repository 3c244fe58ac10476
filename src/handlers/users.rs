// src/handlers/users.rs

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
    models::{
        auth::User,
        user::{CreateUserPayload, RejectUserPayload, UpdateUserPayload, UserQuery},
    },
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Accounts of the caller's barangay", body = Vec<User>),
        (status = 403, description = "Admins only")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .user_service
        .list(&tenant.principal, &tenant.scope, &query)
        .await?;
    Ok(Json(page.into_body("users")))
}

// GET /api/users/pending
#[utoipa::path(
    get,
    path = "/api/users/pending",
    tag = "Users",
    responses(
        (status = 200, description = "Self-registrations waiting for approval", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_pending_users(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .user_service
        .list_pending(&tenant.principal, &tenant.scope, query)
        .await?;
    Ok(Json(page.into_body("users")))
}

// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = User),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_service
        .get(&tenant.principal, &tenant.scope, id)
        .await?;
    Ok(Json(json!({ "user": user })))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Validation failed or email already registered"),
        (status = 403, description = "Only super admins create super admins")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.create(&tenant.principal, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    ))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Account updated", body = User),
        (status = 400, description = "Own role change or self-deactivation"),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .user_service
        .update(&tenant.principal, &tenant.scope, id, payload)
        .await?;
    Ok(Json(json!({ "message": "User updated successfully", "user": user })))
}

// PATCH /api/users/{id}/approve
#[utoipa::path(
    patch,
    path = "/api/users/{id}/approve",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Registration approved", body = User),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_user(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_service
        .approve(&tenant.principal, &tenant.scope, id)
        .await?;
    Ok(Json(json!({ "message": "User approved successfully", "user": user })))
}

// PATCH /api/users/{id}/reject
#[utoipa::path(
    patch,
    path = "/api/users/{id}/reject",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = RejectUserPayload,
    responses(
        (status = 200, description = "Registration rejected", body = User),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_user(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    payload: Option<Json<RejectUserPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .user_service
        .reject(&tenant.principal, &tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "User rejected", "user": user })))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .delete(&tenant.principal, &tenant.scope, id)
        .await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
