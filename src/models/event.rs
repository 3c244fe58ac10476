// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::lifecycle::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl Lifecycle for EventStatus {
    const RETIRED: Self = EventStatus::Cancelled;
    const HIDDEN: &'static [Self] = &[EventStatus::Cancelled];

    fn label(self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        match self {
            EventStatus::Upcoming => true,
            EventStatus::Ongoing => matches!(next, EventStatus::Completed | EventStatus::Cancelled),
            EventStatus::Completed => false,
            // Rescheduled.
            EventStatus::Cancelled => next == EventStatus::Upcoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i64,
    pub barangay_id: i64,
    #[schema(example = "Barangay Assembly")]
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub organizer: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn schedule_order(
    start_at: DateTime<Utc>,
    end_at: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if end_at.is_some_and(|end| end < start_at) {
        let mut err = ValidationError::new("schedule_order");
        err.message = Some("end_at must not be before start_at".into());
        return Err(err);
    }
    Ok(())
}

fn create_schedule(payload: &CreateEventPayload) -> Result<(), ValidationError> {
    schedule_order(payload.start_at, payload.end_at)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "create_schedule"))]
pub struct CreateEventPayload {
    pub barangay_id: Option<i64>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub organizer: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventPayload {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<EventStatus>,
    /// Only events starting at or after this instant.
    pub from: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn events_cannot_end_before_they_start() {
        let start = Utc::now();
        assert!(schedule_order(start, Some(start - Duration::hours(1))).is_err());
        assert!(schedule_order(start, Some(start + Duration::hours(2))).is_ok());
    }

    #[test]
    fn cancelled_events_can_be_rescheduled() {
        assert!(EventStatus::Cancelled.can_transition_to(EventStatus::Upcoming));
        assert!(!EventStatus::Completed.can_transition_to(EventStatus::Upcoming));
    }
}
