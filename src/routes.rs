// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, rbac::policy_guard},
};

/// Full application router. Protected routes are registered with their
/// complete `/api/...` template so `MatchedPath` lines up with the keys of
/// the route policy table.
pub fn build_router(app_state: AppState) -> Router {
    // --- Public ---
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route("/api/barangays/public", get(handlers::tenancy::list_public_barangays));

    // --- Protected (auth_guard, then policy_guard) ---
    let protected_routes = Router::new()
        // Auth
        .route("/api/auth/me", get(handlers::auth::get_me))
        .route("/api/auth/change-password", put(handlers::auth::change_password))
        // Barangays
        .route(
            "/api/barangays",
            get(handlers::tenancy::list_barangays).post(handlers::tenancy::create_barangay),
        )
        .route(
            "/api/barangays/{id}",
            get(handlers::tenancy::get_barangay)
                .put(handlers::tenancy::update_barangay)
                .delete(handlers::tenancy::delete_barangay),
        )
        // Users
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/api/users/pending", get(handlers::users::list_pending_users))
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/api/users/{id}/approve", patch(handlers::users::approve_user))
        .route("/api/users/{id}/reject", patch(handlers::users::reject_user))
        // Residents
        .route(
            "/api/residents",
            get(handlers::residents::list_residents).post(handlers::residents::create_resident),
        )
        .route(
            "/api/residents/{id}",
            get(handlers::residents::get_resident)
                .put(handlers::residents::update_resident)
                .delete(handlers::residents::delete_resident),
        )
        // Households
        .route(
            "/api/households",
            get(handlers::households::list_households).post(handlers::households::create_household),
        )
        .route(
            "/api/households/{id}",
            get(handlers::households::get_household)
                .put(handlers::households::update_household)
                .delete(handlers::households::delete_household),
        )
        // Businesses
        .route(
            "/api/businesses",
            get(handlers::businesses::list_businesses).post(handlers::businesses::create_business),
        )
        .route(
            "/api/businesses/{id}",
            get(handlers::businesses::get_business)
                .put(handlers::businesses::update_business)
                .delete(handlers::businesses::delete_business),
        )
        // Permits
        .route(
            "/api/permits",
            get(handlers::permits::list_permits).post(handlers::permits::create_permit),
        )
        .route(
            "/api/permits/{id}",
            get(handlers::permits::get_permit)
                .put(handlers::permits::update_permit)
                .delete(handlers::permits::delete_permit),
        )
        .route("/api/permits/{id}/status", patch(handlers::permits::update_permit_status))
        // Documents
        .route(
            "/api/documents",
            get(handlers::documents::list_documents).post(handlers::documents::create_document),
        )
        .route(
            "/api/documents/{id}",
            get(handlers::documents::get_document)
                .put(handlers::documents::update_document)
                .delete(handlers::documents::delete_document),
        )
        .route(
            "/api/documents/{id}/status",
            patch(handlers::documents::update_document_status),
        )
        // Incidents
        .route(
            "/api/incidents",
            get(handlers::incidents::list_incidents).post(handlers::incidents::create_incident),
        )
        .route(
            "/api/incidents/{id}",
            get(handlers::incidents::get_incident)
                .put(handlers::incidents::update_incident)
                .delete(handlers::incidents::delete_incident),
        )
        // Officials
        .route(
            "/api/officials",
            get(handlers::officials::list_officials).post(handlers::officials::create_official),
        )
        .route(
            "/api/officials/{id}",
            get(handlers::officials::get_official)
                .put(handlers::officials::update_official)
                .delete(handlers::officials::delete_official),
        )
        // Announcements
        .route(
            "/api/announcements",
            get(handlers::announcements::list_announcements)
                .post(handlers::announcements::create_announcement),
        )
        .route(
            "/api/announcements/{id}",
            get(handlers::announcements::get_announcement)
                .put(handlers::announcements::update_announcement)
                .delete(handlers::announcements::delete_announcement),
        )
        // Events
        .route(
            "/api/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/api/events/{id}",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(handlers::dashboard::get_stats))
        // The last layer added runs first.
        .route_layer(axum_middleware::from_fn(policy_guard))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}
