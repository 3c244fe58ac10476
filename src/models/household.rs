// src/models/household.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::{non_negative, nullable};
use crate::models::resident::Resident;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Household {
    pub id: i64,
    pub barangay_id: i64,
    #[schema(example = "HH-0012")]
    pub household_number: String,
    pub address: String,
    pub purok: Option<String>,
    pub head_resident_id: Option<i64>,
    #[schema(value_type = Option<f64>, example = 15000.0)]
    pub monthly_income: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `GET /households/{id}` also lists who lives there.
#[derive(Debug, Serialize, ToSchema)]
pub struct HouseholdDetail {
    #[serde(flatten)]
    pub household: Household,
    pub members: Vec<Resident>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHouseholdPayload {
    pub barangay_id: Option<i64>,
    #[validate(length(min = 1, message = "Household number is required"))]
    pub household_number: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub purok: Option<String>,
    pub head_resident_id: Option<i64>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<f64>)]
    pub monthly_income: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateHouseholdPayload {
    #[validate(length(min = 1, message = "Household number cannot be empty"))]
    pub household_number: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    pub purok: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub head_resident_id: Option<Option<i64>>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<f64>)]
    pub monthly_income: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HouseholdQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches household number or address.
    pub search: Option<String>,
    pub purok: Option<String>,
}
