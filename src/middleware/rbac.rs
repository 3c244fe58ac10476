// src/middleware/rbac.rs

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    models::auth::Principal,
    policy::routes,
};

/// Single gate for every protected route: looks the matched route up in
/// `ROUTE_POLICIES` and checks the caller's role against it. Routes without
/// an entry are denied.
///
/// Must run after `auth_guard`, so it is layered before it.
pub async fn policy_guard(mut request: Request, next: Next) -> Result<Response, AppError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .copied()
        .ok_or(AppError::MissingToken)?;

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .ok_or(AppError::AccessDenied)?;

    let Some(policy) = routes::lookup(request.method(), &path) else {
        tracing::warn!(method = %request.method(), path = %path, "Protected route has no policy entry");
        return Err(AppError::AccessDenied);
    };

    if !policy.requires.allows(principal.role) {
        tracing::debug!(
            user_id = principal.id,
            role = principal.role.as_str(),
            method = %request.method(),
            path = %path,
            "Role gate rejected request"
        );
        return Err(AppError::AccessDenied);
    }

    request.extensions_mut().insert(*policy);
    Ok(next.run(request).await)
}
