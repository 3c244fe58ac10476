// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    models::auth::Principal,
    policy::{RoutePolicy, ScopeMode, TenantScope},
};

// Only read for super admins; everyone else is pinned to their own barangay.
#[derive(Debug, Default, Deserialize)]
struct BarangayOverride {
    barangay_id: Option<i64>,
}

/// Who is calling plus the barangay filter their route runs under.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub principal: Principal,
    pub scope: TenantScope,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or(AppError::MissingToken)?;

        let mode = parts
            .extensions
            .get::<RoutePolicy>()
            .map(|policy| policy.scope)
            .ok_or(AppError::AccessDenied)?;

        let scope = match mode {
            ScopeMode::Unscoped => TenantScope::Unrestricted,
            ScopeMode::Tenant => {
                // A malformed override is ignored rather than rejected.
                let requested = Query::<BarangayOverride>::from_request_parts(parts, state)
                    .await
                    .map(|Query(q)| q.barangay_id)
                    .unwrap_or_default();
                TenantScope::resolve(&principal, requested)
            }
        };

        Ok(TenantContext { principal, scope })
    }
}
