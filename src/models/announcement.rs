// src/models/announcement.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::lifecycle::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "announcement_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementStatus {
    Draft,
    Published,
    Archived,
}

impl Lifecycle for AnnouncementStatus {
    const RETIRED: Self = AnnouncementStatus::Archived;
    const HIDDEN: &'static [Self] = &[AnnouncementStatus::Archived];

    fn label(self) -> &'static str {
        match self {
            AnnouncementStatus::Draft => "draft",
            AnnouncementStatus::Published => "published",
            AnnouncementStatus::Archived => "archived",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        match self {
            AnnouncementStatus::Draft | AnnouncementStatus::Published => true,
            AnnouncementStatus::Archived => next == AnnouncementStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "announcement_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementPriority {
    Low,
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Announcement {
    pub id: i64,
    pub barangay_id: i64,
    #[schema(example = "Water interruption on Saturday")]
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub priority: AnnouncementPriority,
    pub status: AnnouncementStatus,
    pub author_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementPayload {
    pub barangay_id: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub category: Option<String>,
    pub priority: Option<AnnouncementPriority>,
    /// Defaults to `draft`.
    pub status: Option<AnnouncementStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAnnouncementPayload {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub category: Option<String>,
    pub priority: Option<AnnouncementPriority>,
    pub status: Option<AnnouncementStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AnnouncementQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<AnnouncementPriority>,
    pub status: Option<AnnouncementStatus>,
}
