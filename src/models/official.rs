// src/models/official.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::lifecycle::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "official_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfficialStatus {
    Active,
    Inactive,
}

impl Lifecycle for OfficialStatus {
    const RETIRED: Self = OfficialStatus::Inactive;
    const HIDDEN: &'static [Self] = &[OfficialStatus::Inactive];

    fn label(self) -> &'static str {
        match self {
            OfficialStatus::Active => "active",
            OfficialStatus::Inactive => "inactive",
        }
    }

    fn can_transition_to(self, _next: Self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Official {
    pub id: i64,
    pub barangay_id: i64,
    pub resident_id: Option<i64>,
    #[schema(example = "Hon. Ramon Bautista")]
    pub full_name: String,
    #[schema(example = "kagawad")]
    pub position: String,
    #[schema(example = "Peace and Order")]
    pub committee: Option<String>,
    #[schema(value_type = String, format = Date)]
    pub term_start: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub term_end: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub status: OfficialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn term_order(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    if end.is_some_and(|end| end < start) {
        let mut err = ValidationError::new("term_order");
        err.message = Some("term_end must not be before term_start".into());
        return Err(err);
    }
    Ok(())
}

fn create_term(payload: &CreateOfficialPayload) -> Result<(), ValidationError> {
    term_order(payload.term_start, payload.term_end)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "create_term"))]
pub struct CreateOfficialPayload {
    pub barangay_id: Option<i64>,
    pub resident_id: Option<i64>,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    pub committee: Option<String>,
    #[schema(value_type = String, format = Date)]
    pub term_start: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub term_end: Option<NaiveDate>,
    pub contact_number: Option<String>,
}

/// Term ordering is checked against the stored row once merged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOfficialPayload {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, message = "Position cannot be empty"))]
    pub position: Option<String>,
    pub committee: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub term_start: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub term_end: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub status: Option<OfficialStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OfficialQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub position: Option<String>,
    pub status: Option<OfficialStatus>,
}
