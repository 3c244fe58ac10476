// src/db/announcement_repo.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::announcement::{
        Announcement, AnnouncementPriority, AnnouncementQuery, AnnouncementStatus,
        CreateAnnouncementPayload, UpdateAnnouncementPayload,
    },
    policy::TenantScope,
};

#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &AnnouncementQuery) -> Result<Page<Announcement>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(
            &self.pool,
            "announcements",
            "COALESCE(published_at, created_at) DESC, id DESC",
            page,
            |qb| {
                scope.push_clause(qb, "barangay_id");
                push_visibility(qb, query.status);
                if let Some(category) = query.category.as_deref() {
                    qb.push(" AND category = ").push_bind(category.to_string());
                }
                if let Some(priority) = query.priority {
                    qb.push(" AND priority = ").push_bind(priority);
                }
                if let Some(pattern) = &pattern {
                    qb.push(" AND (title ILIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR content ILIKE ")
                        .push_bind(pattern.clone())
                        .push(")");
                }
            },
        )
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Announcement>, AppError> {
        fetch_scoped(&self.pool, "announcements", scope, id).await
    }

    pub async fn create(
        &self,
        barangay_id: i64,
        author_id: i64,
        payload: &CreateAnnouncementPayload,
    ) -> Result<Announcement, AppError> {
        let status = payload.status.unwrap_or(AnnouncementStatus::Draft);
        let published_at = (status == AnnouncementStatus::Published).then(Utc::now);

        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (
                barangay_id, title, content, category, priority, status, author_id, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.title.trim())
        .bind(&payload.content)
        .bind(&payload.category)
        .bind(payload.priority.unwrap_or(AnnouncementPriority::Normal))
        .bind(status)
        .bind(author_id)
        .bind(published_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(announcement)
    }

    /// The first publication stamps `published_at`; republishing keeps it.
    pub async fn update(
        &self,
        current: &Announcement,
        changes: &UpdateAnnouncementPayload,
    ) -> Result<Announcement, AppError> {
        let publishing = changes.status == Some(AnnouncementStatus::Published);

        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            UPDATE announcements SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                status = COALESCE($7, status),
                published_at = CASE WHEN $8 THEN COALESCE(published_at, NOW()) ELSE published_at END,
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(&changes.content)
        .bind(&changes.category)
        .bind(changes.priority)
        .bind(changes.status)
        .bind(publishing)
        .fetch_one(&self.pool)
        .await?;
        Ok(announcement)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<AnnouncementStatus>(&self.pool, "announcements", scope, id, "Announcement").await
    }
}
