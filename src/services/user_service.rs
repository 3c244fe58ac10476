// src/services/user_service.rs

use std::sync::Arc;

use crate::{
    common::{error::AppError, pagination::Page},
    db::{user_repo::NewUser, BarangayRepository, UserRepository},
    models::{
        auth::{ApprovalStatus, Principal, Role, User},
        user::{CreateUserPayload, RejectUserPayload, UpdateUserPayload, UserQuery},
    },
    policy::TenantScope,
    services::{
        auth::hash_password,
        notification::{dispatch, Notification, Notifier},
        tenancy_service::stamp_active_barangay,
    },
};

/// Rules on changes a principal makes to an account, checked before any
/// storage access.
pub(crate) fn check_account_change(
    principal: &Principal,
    target: &User,
    changes: &UpdateUserPayload,
) -> Result<(), AppError> {
    let is_self = principal.id == target.id;

    if let Some(role) = changes.role {
        if is_self && role != target.role {
            return Err(AppError::BadRequest("You cannot change your own role".to_string()));
        }
        if role == Role::SuperAdmin && !principal.is_super_admin() {
            return Err(AppError::AccessDenied);
        }
    }

    if is_self && changes.is_active == Some(false) {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    let role = changes.role.unwrap_or(target.role);
    let barangay_id = changes.barangay_id.or(target.barangay_id);
    if role != Role::SuperAdmin && barangay_id.is_none() {
        return Err(AppError::BadRequest(
            "barangay_id is required for this role".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    barangay_repo: BarangayRepository,
    notifier: Arc<dyn Notifier>,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        barangay_repo: BarangayRepository,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { user_repo, barangay_repo, notifier }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        query: &UserQuery,
    ) -> Result<Page<User>, AppError> {
        self.user_repo
            .list(scope, query, principal.is_super_admin())
            .await
    }

    /// Self-registrations waiting for an official.
    pub async fn list_pending(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        query: UserQuery,
    ) -> Result<Page<User>, AppError> {
        let query = UserQuery {
            approval_status: Some(ApprovalStatus::Pending),
            ..query
        };
        self.list(principal, scope, &query).await
    }

    /// Super admin accounts are invisible to everyone else.
    pub async fn get(&self, principal: &Principal, scope: &TenantScope, id: i64) -> Result<User, AppError> {
        self.user_repo
            .find_scoped(scope, id, principal.is_super_admin())
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// Accounts created by officials are approved from the start.
    pub async fn create(&self, principal: &Principal, payload: &CreateUserPayload) -> Result<User, AppError> {
        let barangay_id = if payload.role == Role::SuperAdmin {
            if !principal.is_super_admin() {
                return Err(AppError::AccessDenied);
            }
            payload.barangay_id
        } else {
            Some(stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?)
        };

        let password_hash = hash_password(&payload.password).await?;
        let user = self
            .user_repo
            .create(
                self.user_repo.pool(),
                &NewUser {
                    barangay_id,
                    email: &payload.email,
                    password_hash: &password_hash,
                    first_name: &payload.first_name,
                    last_name: &payload.last_name,
                    contact_number: payload.contact_number.as_deref(),
                    role: payload.role,
                    approval_status: ApprovalStatus::Approved,
                },
            )
            .await?;

        tracing::info!(user_id = user.id, role = user.role.as_str(), created_by = principal.id, "User created");
        Ok(user)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        mut changes: UpdateUserPayload,
    ) -> Result<User, AppError> {
        // Only a super admin moves accounts between barangays.
        if !principal.is_super_admin() {
            changes.barangay_id = None;
        }

        let target = self.get(principal, scope, id).await?;
        check_account_change(principal, &target, &changes)?;

        if let Some(barangay_id) = changes.barangay_id {
            self.barangay_repo
                .find_by_id(barangay_id)
                .await?
                .ok_or(AppError::NotFound("Barangay"))?;
        }

        let user = self.user_repo.update(target.id, &changes).await?;
        if changes.role.is_some_and(|role| role != target.role) {
            tracing::info!(user_id = user.id, from = target.role.as_str(), to = user.role.as_str(), "Role changed");
        }
        Ok(user)
    }

    pub async fn approve(&self, principal: &Principal, scope: &TenantScope, id: i64) -> Result<User, AppError> {
        let target = self.get(principal, scope, id).await?;
        if target.approval_status == ApprovalStatus::Approved {
            return Err(AppError::BadRequest("User is already approved".to_string()));
        }

        let user = self.user_repo.set_approval(target.id, ApprovalStatus::Approved).await?;
        tracing::info!(user_id = user.id, approved_by = principal.id, "Registration approved");

        dispatch(
            self.notifier.clone(),
            Notification::AccountApproved {
                email: user.email.clone(),
                first_name: user.first_name.clone(),
            },
        );
        Ok(user)
    }

    pub async fn reject(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        payload: &RejectUserPayload,
    ) -> Result<User, AppError> {
        let target = self.get(principal, scope, id).await?;
        if target.id == principal.id {
            return Err(AppError::BadRequest("You cannot reject your own account".to_string()));
        }

        let user = self.user_repo.set_approval(target.id, ApprovalStatus::Rejected).await?;
        tracing::info!(user_id = user.id, rejected_by = principal.id, "Registration rejected");

        dispatch(
            self.notifier.clone(),
            Notification::AccountRejected {
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                reason: payload.reason.clone(),
            },
        );
        Ok(user)
    }

    pub async fn delete(&self, principal: &Principal, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        if id == principal.id {
            return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
        }

        let target = self.get(principal, scope, id).await?;
        if !self.user_repo.delete(target.id).await? {
            return Err(AppError::NotFound("User"));
        }
        tracing::info!(user_id = target.id, deleted_by = principal.id, "User deleted");
        Ok(())
    }
}
