// src/handlers/documents.rs

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
    models::document::{
        CreateDocumentPayload, Document, DocumentQuery, UpdateDocumentPayload,
        UpdateDocumentStatusPayload,
    },
};

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    responses((status = 200, description = "Document requests", body = Vec<Document>)),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.document_service.list(&tenant.scope, &query).await?;
    Ok(Json(page.into_body("documents")))
}

// GET /api/documents/{id}
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document request", body = Document),
        (status = 404, description = "Document not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_document(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let document = app_state.document_service.get(&tenant.scope, id).await?;
    Ok(Json(json!({ "document": document })))
}

// POST /api/documents
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body = CreateDocumentPayload,
    responses(
        (status = 201, description = "Request filed under a new control number", body = Document),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Resident not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_document(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateDocumentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let document = app_state
        .document_service
        .create(&tenant.principal, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Document request created successfully", "document": document })),
    ))
}

// PUT /api/documents/{id}
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = i64, Path, description = "Document ID")),
    request_body = UpdateDocumentPayload,
    responses(
        (status = 200, description = "Request updated", body = Document),
        (status = 400, description = "Released or cancelled requests are read-only"),
        (status = 404, description = "Document not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_document(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDocumentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let document = app_state
        .document_service
        .update(&tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Document updated successfully", "document": document })))
}

// PATCH /api/documents/{id}/status
#[utoipa::path(
    patch,
    path = "/api/documents/{id}/status",
    tag = "Documents",
    params(("id" = i64, Path, description = "Document ID")),
    request_body = UpdateDocumentStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Document),
        (status = 400, description = "Illegal status change"),
        (status = 404, description = "Document not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_document_status(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDocumentStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let document = app_state
        .document_service
        .update_status(&tenant.principal, &tenant.scope, id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Document status updated", "document": document })))
}

// DELETE /api/documents/{id}
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Request cancelled"),
        (status = 404, description = "Document not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.document_service.delete(&tenant.scope, id).await?;
    Ok(Json(json!({ "message": "Document deleted successfully" })))
}
