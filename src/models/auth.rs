// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Roles
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Operates across every barangay.
    SuperAdmin,
    BarangayAdmin,
    Captain,
    Secretary,
    Treasurer,
    Staff,
    /// Self-registered member of a barangay.
    Resident,
}

impl Role {
    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::BarangayAdmin => "barangay_admin",
            Role::Captain => "captain",
            Role::Secretary => "secretary",
            Role::Treasurer => "treasurer",
            Role::Staff => "staff",
            Role::Resident => "resident",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "approval_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

// ---
// 2. User (row of the `users` table)
// ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub barangay_id: Option<i64>,
    pub email: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub contact_number: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_approved: bool,
    pub approval_status: ApprovalStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Residents only get a session once an official approved them.
    pub fn may_sign_in(&self) -> Result<(), ApprovalStatus> {
        if self.role == Role::Resident
            && !(self.is_approved && self.approval_status == ApprovalStatus::Approved)
        {
            return Err(self.approval_status);
        }
        Ok(())
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            barangay_id: self.barangay_id,
        }
    }
}

// ---
// 3. Principal (who is calling)
// ---
/// Identity carried by a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
    pub barangay_id: Option<i64>,
}

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

// ---
// 4. Tokens
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub barangay_id: Option<i64>,
    pub kind: TokenKind,
    pub jti: Uuid,
    pub exp: usize,
    pub iat: usize,
}

// ---
// 5. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "secretary@poblacion.gov.ph")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterPayload {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub contact_number: Option<String>,
    #[schema(example = 3)]
    pub barangay_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshPayload {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Body returned by login and refresh.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, is_approved: bool, approval_status: ApprovalStatus) -> User {
        let now = Utc::now();
        User {
            id: 1,
            barangay_id: Some(3),
            email: "juan@example.com".into(),
            password_hash: String::new(),
            first_name: "Juan".into(),
            last_name: "Dela Cruz".into(),
            contact_number: None,
            role,
            is_active: true,
            is_approved,
            approval_status,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pending_resident_cannot_sign_in() {
        let u = user(Role::Resident, false, ApprovalStatus::Pending);
        assert_eq!(u.may_sign_in(), Err(ApprovalStatus::Pending));
    }

    #[test]
    fn resident_needs_both_flag_and_status() {
        let u = user(Role::Resident, true, ApprovalStatus::Rejected);
        assert_eq!(u.may_sign_in(), Err(ApprovalStatus::Rejected));

        let u = user(Role::Resident, true, ApprovalStatus::Approved);
        assert_eq!(u.may_sign_in(), Ok(()));
    }

    #[test]
    fn officials_are_not_subject_to_approval() {
        let u = user(Role::Secretary, false, ApprovalStatus::Pending);
        assert_eq!(u.may_sign_in(), Ok(()));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(user(Role::Staff, true, ApprovalStatus::Approved)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "staff");
    }
}
