// src/models/resident.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{
    lifecycle::Lifecycle,
    validation::{not_in_future, nullable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "resident_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResidentStatus {
    Active,
    Inactive,
    Deceased,
    MovedOut,
}

impl Lifecycle for ResidentStatus {
    const RETIRED: Self = ResidentStatus::Inactive;
    const HIDDEN: &'static [Self] = &[ResidentStatus::Inactive];

    fn label(self) -> &'static str {
        match self {
            ResidentStatus::Active => "active",
            ResidentStatus::Inactive => "inactive",
            ResidentStatus::Deceased => "deceased",
            ResidentStatus::MovedOut => "moved_out",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        use ResidentStatus::*;
        match self {
            Active => true,
            Inactive => next == Active,
            // Terminal; kept for the record.
            MovedOut | Deceased => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "civil_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CivilStatus {
    Single,
    Married,
    Widowed,
    Separated,
    Divorced,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Resident {
    pub id: i64,
    pub barangay_id: i64,
    pub household_id: Option<i64>,
    #[schema(example = "Juan")]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[schema(example = "Dela Cruz")]
    pub last_name: String,
    pub suffix: Option<String>,
    #[schema(value_type = String, format = Date, example = "1990-05-20")]
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub civil_status: CivilStatus,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub is_voter: bool,
    pub is_pwd: bool,
    pub status: ResidentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResidentPayload {
    /// Only honoured for super admins.
    pub barangay_id: Option<i64>,
    pub household_id: Option<i64>,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub suffix: Option<String>,
    #[validate(custom(function = "not_in_future"))]
    #[schema(value_type = String, format = Date, example = "1990-05-20")]
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub civil_status: Option<CivilStatus>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    #[serde(default)]
    pub is_voter: bool,
    #[serde(default)]
    pub is_pwd: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateResidentPayload {
    /// `null` detaches the resident from their household.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub household_id: Option<Option<i64>>,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    #[validate(custom(function = "not_in_future"))]
    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub civil_status: Option<CivilStatus>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub is_voter: Option<bool>,
    pub is_pwd: Option<bool>,
    pub status: Option<ResidentStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResidentQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches first, middle or last name.
    pub search: Option<String>,
    pub status: Option<ResidentStatus>,
    pub household_id: Option<i64>,
    pub gender: Option<Gender>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deceased_residents_cannot_come_back() {
        assert!(!ResidentStatus::Deceased.can_transition_to(ResidentStatus::Active));
        assert!(ResidentStatus::Active.can_transition_to(ResidentStatus::Deceased));
        assert!(ResidentStatus::Inactive.can_transition_to(ResidentStatus::Active));
        assert!(!ResidentStatus::MovedOut.can_transition_to(ResidentStatus::Active));
        assert!(!ResidentStatus::Deceased.can_transition_to(ResidentStatus::Inactive));
    }

    #[test]
    fn update_payload_can_clear_household() {
        let payload: UpdateResidentPayload =
            serde_json::from_str(r#"{"household_id": null, "occupation": "Farmer"}"#).unwrap();
        assert_eq!(payload.household_id, Some(None));
        assert_eq!(payload.occupation.as_deref(), Some("Farmer"));
    }

    #[test]
    fn future_birth_date_fails_validation() {
        let payload: CreateResidentPayload = serde_json::from_value(serde_json::json!({
            "first_name": "Maria",
            "last_name": "Santos",
            "birth_date": "2999-01-01",
            "gender": "female"
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("birth_date"));
    }
}
