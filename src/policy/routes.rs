// src/policy/routes.rs

use axum::http::Method;

use crate::policy::roles::{RoleRequirement, APPROVERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Verb::Get),
            Method::POST => Some(Verb::Post),
            Method::PUT => Some(Verb::Put),
            Method::PATCH => Some(Verb::Patch),
            Method::DELETE => Some(Verb::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// Reads and writes are narrowed to the caller's barangay.
    Tenant,
    /// The route only touches the caller's own account (or creates barangays).
    Unscoped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    pub verb: Verb,
    pub path: &'static str,
    pub requires: RoleRequirement,
    pub scope: ScopeMode,
}

const fn tenant(verb: Verb, path: &'static str, requires: RoleRequirement) -> RoutePolicy {
    RoutePolicy { verb, path, requires, scope: ScopeMode::Tenant }
}

const fn unscoped(verb: Verb, path: &'static str, requires: RoleRequirement) -> RoutePolicy {
    RoutePolicy { verb, path, requires, scope: ScopeMode::Unscoped }
}

use RoleRequirement::{AdminOrAbove, Authenticated, Financial, OneOf, StaffOrAbove, SuperAdminOnly};
use Verb::{Delete, Get, Patch, Post, Put};

/// Every protected route. Paths are the axum route templates, so a lookup is
/// keyed by `MatchedPath`. A protected route missing here is denied.
pub static ROUTE_POLICIES: &[RoutePolicy] = &[
    // --- Auth ---
    unscoped(Get, "/api/auth/me", Authenticated),
    unscoped(Put, "/api/auth/change-password", Authenticated),
    // --- Barangays ---
    tenant(Get, "/api/barangays", Authenticated),
    unscoped(Post, "/api/barangays", SuperAdminOnly),
    tenant(Get, "/api/barangays/{id}", Authenticated),
    tenant(Put, "/api/barangays/{id}", AdminOrAbove),
    tenant(Delete, "/api/barangays/{id}", SuperAdminOnly),
    // --- Users ---
    tenant(Get, "/api/users", AdminOrAbove),
    tenant(Post, "/api/users", AdminOrAbove),
    tenant(Get, "/api/users/pending", OneOf(APPROVERS)),
    tenant(Get, "/api/users/{id}", AdminOrAbove),
    tenant(Put, "/api/users/{id}", AdminOrAbove),
    tenant(Delete, "/api/users/{id}", AdminOrAbove),
    tenant(Patch, "/api/users/{id}/approve", OneOf(APPROVERS)),
    tenant(Patch, "/api/users/{id}/reject", OneOf(APPROVERS)),
    // --- Residents ---
    tenant(Get, "/api/residents", StaffOrAbove),
    tenant(Post, "/api/residents", StaffOrAbove),
    tenant(Get, "/api/residents/{id}", StaffOrAbove),
    tenant(Put, "/api/residents/{id}", StaffOrAbove),
    tenant(Delete, "/api/residents/{id}", AdminOrAbove),
    // --- Households ---
    tenant(Get, "/api/households", StaffOrAbove),
    tenant(Post, "/api/households", StaffOrAbove),
    tenant(Get, "/api/households/{id}", StaffOrAbove),
    tenant(Put, "/api/households/{id}", StaffOrAbove),
    tenant(Delete, "/api/households/{id}", AdminOrAbove),
    // --- Businesses ---
    tenant(Get, "/api/businesses", StaffOrAbove),
    tenant(Post, "/api/businesses", StaffOrAbove),
    tenant(Get, "/api/businesses/{id}", StaffOrAbove),
    tenant(Put, "/api/businesses/{id}", StaffOrAbove),
    tenant(Delete, "/api/businesses/{id}", AdminOrAbove),
    // --- Permits ---
    tenant(Get, "/api/permits", StaffOrAbove),
    tenant(Post, "/api/permits", StaffOrAbove),
    tenant(Get, "/api/permits/{id}", StaffOrAbove),
    tenant(Put, "/api/permits/{id}", StaffOrAbove),
    tenant(Patch, "/api/permits/{id}/status", Financial),
    tenant(Delete, "/api/permits/{id}", AdminOrAbove),
    // --- Documents ---
    tenant(Get, "/api/documents", StaffOrAbove),
    tenant(Post, "/api/documents", StaffOrAbove),
    tenant(Get, "/api/documents/{id}", StaffOrAbove),
    tenant(Put, "/api/documents/{id}", StaffOrAbove),
    tenant(Patch, "/api/documents/{id}/status", StaffOrAbove),
    tenant(Delete, "/api/documents/{id}", AdminOrAbove),
    // --- Incidents (blotter) ---
    tenant(Get, "/api/incidents", StaffOrAbove),
    tenant(Post, "/api/incidents", StaffOrAbove),
    tenant(Get, "/api/incidents/{id}", StaffOrAbove),
    tenant(Put, "/api/incidents/{id}", StaffOrAbove),
    tenant(Delete, "/api/incidents/{id}", AdminOrAbove),
    // --- Officials ---
    tenant(Get, "/api/officials", StaffOrAbove),
    tenant(Post, "/api/officials", AdminOrAbove),
    tenant(Get, "/api/officials/{id}", StaffOrAbove),
    tenant(Put, "/api/officials/{id}", AdminOrAbove),
    tenant(Delete, "/api/officials/{id}", AdminOrAbove),
    // --- Announcements ---
    tenant(Get, "/api/announcements", Authenticated),
    tenant(Post, "/api/announcements", StaffOrAbove),
    tenant(Get, "/api/announcements/{id}", Authenticated),
    tenant(Put, "/api/announcements/{id}", StaffOrAbove),
    tenant(Delete, "/api/announcements/{id}", AdminOrAbove),
    // --- Events ---
    tenant(Get, "/api/events", Authenticated),
    tenant(Post, "/api/events", StaffOrAbove),
    tenant(Get, "/api/events/{id}", Authenticated),
    tenant(Put, "/api/events/{id}", StaffOrAbove),
    tenant(Delete, "/api/events/{id}", AdminOrAbove),
    // --- Dashboard ---
    tenant(Get, "/api/dashboard/stats", StaffOrAbove),
];

pub fn lookup(method: &Method, path: &str) -> Option<&'static RoutePolicy> {
    let verb = Verb::from_method(method)?;
    ROUTE_POLICIES
        .iter()
        .find(|policy| policy.verb == verb && policy.path == path)
}
