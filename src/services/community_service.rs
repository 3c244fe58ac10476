// src/services/community_service.rs
//
// Officials, announcements and events: the public face of a barangay.

use sqlx::PgPool;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{
        db_utils::belongs_to_barangay, error::AppError, lifecycle::ensure_transition,
        pagination::Page,
    },
    db::{AnnouncementRepository, BarangayRepository, EventRepository, OfficialRepository},
    models::{
        announcement::{
            Announcement, AnnouncementQuery, AnnouncementStatus, CreateAnnouncementPayload,
            UpdateAnnouncementPayload,
        },
        auth::{Principal, Role},
        event::{schedule_order, CreateEventPayload, Event, EventQuery, EventStatus, UpdateEventPayload},
        official::{term_order, CreateOfficialPayload, Official, OfficialQuery, UpdateOfficialPayload},
    },
    policy::TenantScope,
    services::tenancy_service::stamp_active_barangay,
};

fn field_error(field: &'static str, error: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

#[derive(Clone)]
pub struct CommunityService {
    official_repo: OfficialRepository,
    announcement_repo: AnnouncementRepository,
    event_repo: EventRepository,
    barangay_repo: BarangayRepository,
    pool: PgPool,
}

impl CommunityService {
    pub fn new(
        official_repo: OfficialRepository,
        announcement_repo: AnnouncementRepository,
        event_repo: EventRepository,
        barangay_repo: BarangayRepository,
        pool: PgPool,
    ) -> Self {
        Self { official_repo, announcement_repo, event_repo, barangay_repo, pool }
    }

    // ---
    // Officials
    // ---
    pub async fn list_officials(&self, scope: &TenantScope, query: &OfficialQuery) -> Result<Page<Official>, AppError> {
        self.official_repo.list(scope, query).await
    }

    pub async fn get_official(&self, scope: &TenantScope, id: i64) -> Result<Official, AppError> {
        self.official_repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Official"))
    }

    pub async fn create_official(
        &self,
        principal: &Principal,
        payload: &CreateOfficialPayload,
    ) -> Result<Official, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        if let Some(resident_id) = payload.resident_id {
            if !belongs_to_barangay(&self.pool, "residents", barangay_id, resident_id).await? {
                return Err(AppError::NotFound("Resident"));
            }
        }

        let official = self.official_repo.create(barangay_id, payload).await?;
        tracing::info!(official_id = official.id, position = %official.position, "Official added");
        Ok(official)
    }

    pub async fn update_official(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateOfficialPayload,
    ) -> Result<Official, AppError> {
        let current = self.get_official(scope, id).await?;

        term_order(
            changes.term_start.unwrap_or(current.term_start),
            changes.term_end.or(current.term_end),
        )
        .map_err(|e| field_error("term_end", e))?;
        if let Some(status) = changes.status {
            ensure_transition(current.status, status)?;
        }

        self.official_repo.update(&current, changes).await
    }

    pub async fn delete_official(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.official_repo.retire(scope, id).await?;
        tracing::info!(official_id = id, "Official marked inactive");
        Ok(())
    }

    // ---
    // Announcements
    // ---
    /// Residents only ever see what has been published.
    pub async fn list_announcements(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        query: AnnouncementQuery,
    ) -> Result<Page<Announcement>, AppError> {
        let query = if principal.role == Role::Resident {
            AnnouncementQuery {
                status: Some(AnnouncementStatus::Published),
                ..query
            }
        } else {
            query
        };
        self.announcement_repo.list(scope, &query).await
    }

    pub async fn get_announcement(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Announcement, AppError> {
        self.announcement_repo
            .find(scope, id)
            .await?
            .filter(|a| principal.role != Role::Resident || a.status == AnnouncementStatus::Published)
            .ok_or(AppError::NotFound("Announcement"))
    }

    pub async fn create_announcement(
        &self,
        principal: &Principal,
        payload: &CreateAnnouncementPayload,
    ) -> Result<Announcement, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        let announcement = self
            .announcement_repo
            .create(barangay_id, principal.id, payload)
            .await?;
        tracing::info!(announcement_id = announcement.id, status = ?announcement.status, "Announcement created");
        Ok(announcement)
    }

    pub async fn update_announcement(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateAnnouncementPayload,
    ) -> Result<Announcement, AppError> {
        let current = self.get_announcement(principal, scope, id).await?;
        if let Some(status) = changes.status {
            ensure_transition(current.status, status)?;
        }
        self.announcement_repo.update(&current, changes).await
    }

    pub async fn delete_announcement(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.announcement_repo.retire(scope, id).await?;
        tracing::info!(announcement_id = id, "Announcement archived");
        Ok(())
    }

    // ---
    // Events
    // ---
    /// Cancelled events are kept from residents even when asked for.
    pub async fn list_events(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        query: EventQuery,
    ) -> Result<Page<Event>, AppError> {
        let query = if principal.role == Role::Resident && query.status == Some(EventStatus::Cancelled) {
            EventQuery { status: None, ..query }
        } else {
            query
        };
        self.event_repo.list(scope, &query).await
    }

    pub async fn get_event(&self, principal: &Principal, scope: &TenantScope, id: i64) -> Result<Event, AppError> {
        self.event_repo
            .find(scope, id)
            .await?
            .filter(|e| principal.role != Role::Resident || e.status != EventStatus::Cancelled)
            .ok_or(AppError::NotFound("Event"))
    }

    pub async fn create_event(&self, principal: &Principal, payload: &CreateEventPayload) -> Result<Event, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        let event = self.event_repo.create(barangay_id, payload).await?;
        tracing::info!(event_id = event.id, start_at = %event.start_at, "Event scheduled");
        Ok(event)
    }

    pub async fn update_event(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateEventPayload,
    ) -> Result<Event, AppError> {
        let current = self.get_event(principal, scope, id).await?;

        schedule_order(
            changes.start_at.unwrap_or(current.start_at),
            changes.end_at.or(current.end_at),
        )
        .map_err(|e| field_error("end_at", e))?;
        if let Some(status) = changes.status {
            ensure_transition(current.status, status)?;
        }

        self.event_repo.update(&current, changes).await
    }

    pub async fn delete_event(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.event_repo.retire(scope, id).await?;
        tracing::info!(event_id = id, "Event cancelled");
        Ok(())
    }
}
