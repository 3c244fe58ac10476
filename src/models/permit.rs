// src/models/permit.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::{lifecycle::Lifecycle, validation::non_negative};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "permit_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PermitStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
    Revoked,
}

impl Lifecycle for PermitStatus {
    const RETIRED: Self = PermitStatus::Revoked;
    const HIDDEN: &'static [Self] = &[PermitStatus::Revoked];

    fn label(self) -> &'static str {
        match self {
            PermitStatus::Pending => "pending",
            PermitStatus::Approved => "approved",
            PermitStatus::Rejected => "rejected",
            PermitStatus::Expired => "expired",
            PermitStatus::Revoked => "revoked",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (PermitStatus::Pending, PermitStatus::Approved | PermitStatus::Rejected)
                | (PermitStatus::Approved, PermitStatus::Expired | PermitStatus::Revoked)
        )
    }
}

/// Business permit; `permit_number` is assigned on creation (`BP-<year>-<n>`).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Permit {
    pub id: i64,
    pub barangay_id: i64,
    pub business_id: i64,
    #[schema(example = "BP-2024-00001")]
    pub permit_number: String,
    #[schema(example = "new")]
    pub permit_type: String,
    #[schema(value_type = f64, example = 500.0)]
    pub fee: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_from: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub status: PermitStatus,
    pub approved_by: Option<i64>,
    pub issued_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validity_window(
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(from), Some(until)) = (valid_from, valid_until) {
        if until < from {
            let mut err = ValidationError::new("validity_window");
            err.message = Some("valid_until must not be before valid_from".into());
            return Err(err);
        }
    }
    Ok(())
}

fn create_window(payload: &CreatePermitPayload) -> Result<(), ValidationError> {
    validity_window(payload.valid_from, payload.valid_until)
}

fn update_window(payload: &UpdatePermitPayload) -> Result<(), ValidationError> {
    validity_window(payload.valid_from, payload.valid_until)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "create_window"))]
pub struct CreatePermitPayload {
    pub barangay_id: Option<i64>,
    pub business_id: i64,
    #[validate(length(min = 1, message = "Permit type is required"))]
    pub permit_type: String,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = f64)]
    pub fee: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_from: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "update_window"))]
pub struct UpdatePermitPayload {
    #[validate(length(min = 1, message = "Permit type cannot be empty"))]
    pub permit_type: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<f64>)]
    pub fee: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_from: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePermitStatusPayload {
    pub status: PermitStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PermitQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches the permit number.
    pub search: Option<String>,
    pub business_id: Option<i64>,
    pub status: Option<PermitStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permit_workflow() {
        assert!(PermitStatus::Pending.can_transition_to(PermitStatus::Approved));
        assert!(PermitStatus::Approved.can_transition_to(PermitStatus::Expired));
        assert!(!PermitStatus::Rejected.can_transition_to(PermitStatus::Approved));
        assert!(!PermitStatus::Pending.can_transition_to(PermitStatus::Expired));
    }

    #[test]
    fn validity_window_must_be_ordered() {
        let payload: CreatePermitPayload = serde_json::from_value(serde_json::json!({
            "business_id": 1,
            "permit_type": "renewal",
            "valid_from": "2024-06-01",
            "valid_until": "2024-01-01"
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }
}
