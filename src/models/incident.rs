// src/models/incident.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::lifecycle::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "incident_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    UnderInvestigation,
    Settled,
    Escalated,
    Dismissed,
    Closed,
    Archived,
}

impl Lifecycle for IncidentStatus {
    const RETIRED: Self = IncidentStatus::Archived;
    const HIDDEN: &'static [Self] = &[IncidentStatus::Archived];

    fn label(self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::UnderInvestigation => "under_investigation",
            IncidentStatus::Settled => "settled",
            IncidentStatus::Escalated => "escalated",
            IncidentStatus::Dismissed => "dismissed",
            IncidentStatus::Closed => "closed",
            IncidentStatus::Archived => "archived",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        use IncidentStatus::*;
        match self {
            Open => next != Open,
            UnderInvestigation => !matches!(next, Open),
            Settled | Escalated | Dismissed => matches!(next, Closed | Archived),
            Closed => next == Archived,
            Archived => false,
        }
    }
}

/// Blotter entry; `blotter_number` is assigned on creation (`BLT-<year>-<n>`).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Incident {
    pub id: i64,
    pub barangay_id: i64,
    #[schema(example = "BLT-2024-00001")]
    pub blotter_number: String,
    #[schema(example = "noise_complaint")]
    pub incident_type: String,
    pub incident_date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub complainant_name: String,
    pub complainant_resident_id: Option<i64>,
    pub respondent_name: Option<String>,
    pub respondent_resident_id: Option<i64>,
    pub resolution: Option<String>,
    pub status: IncidentStatus,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIncidentPayload {
    pub barangay_id: Option<i64>,
    #[validate(length(min = 1, message = "Incident type is required"))]
    pub incident_type: String,
    pub incident_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Complainant name is required"))]
    pub complainant_name: String,
    pub complainant_resident_id: Option<i64>,
    pub respondent_name: Option<String>,
    pub respondent_resident_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentPayload {
    pub incident_type: Option<String>,
    pub incident_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub respondent_name: Option<String>,
    pub respondent_resident_id: Option<i64>,
    pub resolution: Option<String>,
    pub status: Option<IncidentStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IncidentQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches blotter number, complainant or respondent.
    pub search: Option<String>,
    pub incident_type: Option<String>,
    pub status: Option<IncidentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incidents_cannot_reopen() {
        assert!(!IncidentStatus::Settled.can_transition_to(IncidentStatus::Open));
        assert!(!IncidentStatus::UnderInvestigation.can_transition_to(IncidentStatus::Open));
        assert!(IncidentStatus::Open.can_transition_to(IncidentStatus::UnderInvestigation));
        assert!(IncidentStatus::Closed.can_transition_to(IncidentStatus::Archived));
        assert!(!IncidentStatus::Archived.can_transition_to(IncidentStatus::Closed));
    }
}
