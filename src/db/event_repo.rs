// src/db/event_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::event::{CreateEventPayload, Event, EventQuery, EventStatus, UpdateEventPayload},
    policy::TenantScope,
};

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &EventQuery) -> Result<Page<Event>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "events", "start_at, id", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(from) = query.from {
                qb.push(" AND start_at >= ").push_bind(from);
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (title ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR location ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Event>, AppError> {
        fetch_scoped(&self.pool, "events", scope, id).await
    }

    pub async fn create(&self, barangay_id: i64, payload: &CreateEventPayload) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (barangay_id, title, description, location, organizer, start_at, end_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.location.trim())
        .bind(&payload.organizer)
        .bind(payload.start_at)
        .bind(payload.end_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn update(&self, current: &Event, changes: &UpdateEventPayload) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                organizer = COALESCE($6, organizer),
                start_at = COALESCE($7, start_at),
                end_at = COALESCE($8, end_at),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(&changes.description)
        .bind(changes.location.as_deref().map(str::trim))
        .bind(&changes.organizer)
        .bind(changes.start_at)
        .bind(changes.end_at)
        .bind(changes.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<EventStatus>(&self.pool, "events", scope, id, "Event").await
    }
}
