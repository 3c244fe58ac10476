// src/models/business.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{lifecycle::Lifecycle, validation::non_negative};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "business_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Active,
    Suspended,
    Inactive,
    Closed,
}

impl Lifecycle for BusinessStatus {
    const RETIRED: Self = BusinessStatus::Closed;
    const HIDDEN: &'static [Self] = &[BusinessStatus::Closed];

    fn label(self) -> &'static str {
        match self {
            BusinessStatus::Active => "active",
            BusinessStatus::Suspended => "suspended",
            BusinessStatus::Inactive => "inactive",
            BusinessStatus::Closed => "closed",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (_, BusinessStatus::Closed) => true,
            (BusinessStatus::Active, _) => true,
            (BusinessStatus::Suspended, BusinessStatus::Active | BusinessStatus::Inactive) => true,
            (BusinessStatus::Inactive, BusinessStatus::Active) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Business {
    pub id: i64,
    pub barangay_id: i64,
    #[schema(example = "Aling Nena Sari-Sari Store")]
    pub name: String,
    #[schema(example = "retail")]
    pub business_type: String,
    pub owner_name: String,
    pub owner_resident_id: Option<i64>,
    pub address: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub capital: Option<Decimal>,
    pub status: BusinessStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBusinessPayload {
    pub barangay_id: Option<i64>,
    #[validate(length(min = 1, message = "Business name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Business type is required"))]
    pub business_type: String,
    #[validate(length(min = 1, message = "Owner name is required"))]
    pub owner_name: String,
    pub owner_resident_id: Option<i64>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub contact_number: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<f64>)]
    pub capital: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBusinessPayload {
    #[validate(length(min = 1, message = "Business name cannot be empty"))]
    pub name: Option<String>,
    pub business_type: Option<String>,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<f64>)]
    pub capital: Option<Decimal>,
    pub status: Option<BusinessStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BusinessQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches business or owner name.
    pub search: Option<String>,
    pub business_type: Option<String>,
    pub status: Option<BusinessStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::lifecycle::ensure_transition;

    #[test]
    fn any_business_can_close() {
        for from in [
            BusinessStatus::Active,
            BusinessStatus::Suspended,
            BusinessStatus::Inactive,
        ] {
            assert!(ensure_transition(from, BusinessStatus::RETIRED).is_ok());
        }
    }

    #[test]
    fn closed_is_final() {
        assert!(ensure_transition(BusinessStatus::Closed, BusinessStatus::Active).is_err());
        assert!(ensure_transition(BusinessStatus::Inactive, BusinessStatus::Suspended).is_err());
    }
}
