// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::auth::ApprovalStatus;

/// Machine-readable code sent with 401 responses for expired access tokens,
/// so clients know a refresh is worth attempting.
pub const TOKEN_EXPIRED_CODE: &str = "TOKEN_EXPIRED";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    /// Duplicate unique key (barangay + name, barangay + code, email).
    #[error("{0}")]
    Conflict(String),

    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountInactive,

    #[error("Account is not yet approved")]
    AccountNotApproved(ApprovalStatus),

    #[error("Barangay is inactive")]
    BarangayInactive,

    #[error("Access denied")]
    AccessDenied,

    /// Absent rows and rows outside the caller's scope both land here.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::MissingToken
            | AppError::InvalidToken
            | AppError::TokenExpired
            | AppError::InvalidCredentials
            | AppError::AccountInactive
            | AppError::AccountNotApproved(_)
            | AppError::BarangayInactive => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({ "message": self.to_string(), "errors": details })
            }
            AppError::TokenExpired => {
                json!({ "message": self.to_string(), "code": TOKEN_EXPIRED_CODE })
            }
            AppError::AccountNotApproved(approval_status) => json!({
                "message": self.to_string(),
                "approval_status": approval_status,
            }),
            // Everything that ends in a 500 is logged here and hidden from the client.
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Internal server error: {:?}", e);
                json!({ "message": "Server error" })
            }
            e => json!({ "message": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let (status, body) = body_of(AppError::NotFound("Resident")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Resident not found" }));
    }

    #[tokio::test]
    async fn expired_token_carries_machine_code() {
        let (status, body) = body_of(AppError::TokenExpired).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], TOKEN_EXPIRED_CODE);
    }

    #[tokio::test]
    async fn unapproved_login_echoes_approval_status() {
        let (status, body) = body_of(AppError::AccountNotApproved(ApprovalStatus::Pending)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["approval_status"], "pending");
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let (status, body) =
            body_of(AppError::InternalServerError(anyhow::anyhow!("pool exhausted on db-7"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Server error" }));
    }

    #[tokio::test]
    async fn conflicts_are_reported_as_bad_request() {
        let (status, body) =
            body_of(AppError::Conflict("A business with this name already exists".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "A business with this name already exists");
    }
}
