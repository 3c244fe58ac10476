// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{conflict_on_unique, fetch_page, search_pattern},
        error::AppError,
        pagination::{Page, PageRequest},
    },
    models::{
        auth::{ApprovalStatus, Role, User},
        user::{UpdateUserPayload, UserQuery},
    },
    policy::TenantScope,
};

const DUPLICATE_EMAIL: &str = "Email already exists";

/// Columns of a user being inserted; the password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub barangay_id: Option<i64>,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub contact_number: Option<&'a str>,
    pub role: Role,
    pub approval_status: ApprovalStatus,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Scoped lookup. Super admin accounts stay invisible unless
    /// `include_super_admins` is set.
    pub async fn find_scoped(
        &self,
        scope: &TenantScope,
        id: i64,
        include_super_admins: bool,
    ) -> Result<Option<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE id = ");
        qb.push_bind(id);
        scope.push_clause(&mut qb, "barangay_id");
        if !include_super_admins {
            qb.push(" AND role <> ").push_bind(Role::SuperAdmin);
        }
        Ok(qb.build_query_as::<User>().fetch_optional(&self.pool).await?)
    }

    pub async fn list(
        &self,
        scope: &TenantScope,
        query: &UserQuery,
        include_super_admins: bool,
    ) -> Result<Page<User>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "users", "created_at DESC, id DESC", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            if !include_super_admins {
                qb.push(" AND role <> ").push_bind(Role::SuperAdmin);
            }
            if let Some(role) = query.role {
                qb.push(" AND role = ").push_bind(role);
            }
            if let Some(status) = query.approval_status {
                qb.push(" AND approval_status = ").push_bind(status);
            }
            if let Some(is_active) = query.is_active {
                qb.push(" AND is_active = ").push_bind(is_active);
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (first_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR last_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR email ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn create<'e, E>(&self, executor: E, new_user: &NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let approved = new_user.approval_status == ApprovalStatus::Approved;

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                barangay_id, email, password_hash, first_name, last_name,
                contact_number, role, is_approved, approval_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new_user.barangay_id)
        .bind(new_user.email.trim().to_lowercase())
        .bind(new_user.password_hash)
        .bind(new_user.first_name.trim())
        .bind(new_user.last_name.trim())
        .bind(new_user.contact_number)
        .bind(new_user.role)
        .bind(approved)
        .bind(new_user.approval_status)
        .fetch_one(executor)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_EMAIL))
    }

    pub async fn update(&self, id: i64, changes: &UpdateUserPayload) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                contact_number = COALESCE($5, contact_number),
                role = COALESCE($6, role),
                is_active = COALESCE($7, is_active),
                barangay_id = COALESCE($8, barangay_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(changes.first_name.as_deref().map(str::trim))
        .bind(changes.last_name.as_deref().map(str::trim))
        .bind(&changes.contact_number)
        .bind(changes.role)
        .bind(changes.is_active)
        .bind(changes.barangay_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_EMAIL))
    }

    pub async fn set_approval(&self, id: i64, status: ApprovalStatus) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET approval_status = $2, is_approved = ($2 = 'approved'::approval_status), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
