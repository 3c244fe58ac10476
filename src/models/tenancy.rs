// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::lifecycle::Lifecycle;

// ---
// 1. Barangay (the tenant)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "barangay_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BarangayStatus {
    Active,
    Inactive,
}

impl Lifecycle for BarangayStatus {
    const RETIRED: Self = BarangayStatus::Inactive;
    const HIDDEN: &'static [Self] = &[];

    fn label(self) -> &'static str {
        match self {
            BarangayStatus::Active => "active",
            BarangayStatus::Inactive => "inactive",
        }
    }

    fn can_transition_to(self, _next: Self) -> bool {
        true
    }
}

/// Administrative unit owning every other record.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Barangay {
    pub id: i64,
    #[schema(example = "Poblacion")]
    pub name: String,
    #[schema(example = "San Isidro")]
    pub municipality: String,
    #[schema(example = "Nueva Ecija")]
    pub province: String,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: BarangayStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced view for the public registration form.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BarangaySummary {
    pub id: i64,
    pub name: String,
    pub municipality: String,
    pub province: String,
}

// ---
// 2. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBarangayPayload {
    #[validate(length(min = 1, message = "Barangay name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Municipality is required"))]
    pub municipality: String,
    #[validate(length(min = 1, message = "Province is required"))]
    pub province: String,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBarangayPayload {
    #[validate(length(min = 1, message = "Barangay name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Municipality cannot be empty"))]
    pub municipality: Option<String>,
    #[validate(length(min = 1, message = "Province cannot be empty"))]
    pub province: Option<String>,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<BarangayStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BarangayQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<BarangayStatus>,
}
