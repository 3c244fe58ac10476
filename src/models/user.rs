// src/models/user.rs
//
// Payloads of the account administration endpoints; the row itself is
// `models::auth::User`.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::{ApprovalStatus, Role};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    pub barangay_id: Option<i64>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub contact_number: Option<String>,
    pub role: Role,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// Moves the account to another barangay; super admins only.
    pub barangay_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RejectUserPayload {
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches name or email.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub approval_status: Option<ApprovalStatus>,
    pub is_active: Option<bool>,
}
