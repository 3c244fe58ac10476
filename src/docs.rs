// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::refresh,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Barangays ---
        handlers::tenancy::list_public_barangays,
        handlers::tenancy::list_barangays,
        handlers::tenancy::get_barangay,
        handlers::tenancy::create_barangay,
        handlers::tenancy::update_barangay,
        handlers::tenancy::delete_barangay,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::list_pending_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::approve_user,
        handlers::users::reject_user,
        handlers::users::delete_user,

        // --- Residents ---
        handlers::residents::list_residents,
        handlers::residents::get_resident,
        handlers::residents::create_resident,
        handlers::residents::update_resident,
        handlers::residents::delete_resident,

        // --- Households ---
        handlers::households::list_households,
        handlers::households::get_household,
        handlers::households::create_household,
        handlers::households::update_household,
        handlers::households::delete_household,

        // --- Businesses ---
        handlers::businesses::list_businesses,
        handlers::businesses::get_business,
        handlers::businesses::create_business,
        handlers::businesses::update_business,
        handlers::businesses::delete_business,

        // --- Permits ---
        handlers::permits::list_permits,
        handlers::permits::get_permit,
        handlers::permits::create_permit,
        handlers::permits::update_permit,
        handlers::permits::update_permit_status,
        handlers::permits::delete_permit,

        // --- Documents ---
        handlers::documents::list_documents,
        handlers::documents::get_document,
        handlers::documents::create_document,
        handlers::documents::update_document,
        handlers::documents::update_document_status,
        handlers::documents::delete_document,

        // --- Incidents ---
        handlers::incidents::list_incidents,
        handlers::incidents::get_incident,
        handlers::incidents::create_incident,
        handlers::incidents::update_incident,
        handlers::incidents::delete_incident,

        // --- Officials ---
        handlers::officials::list_officials,
        handlers::officials::get_official,
        handlers::officials::create_official,
        handlers::officials::update_official,
        handlers::officials::delete_official,

        // --- Announcements ---
        handlers::announcements::list_announcements,
        handlers::announcements::get_announcement,
        handlers::announcements::create_announcement,
        handlers::announcements::update_announcement,
        handlers::announcements::delete_announcement,

        // --- Events ---
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            common::pagination::Pagination,

            // --- Auth ---
            models::auth::Role,
            models::auth::ApprovalStatus,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::RegisterPayload,
            models::auth::RefreshPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- Barangays ---
            models::tenancy::BarangayStatus,
            models::tenancy::Barangay,
            models::tenancy::BarangaySummary,
            models::tenancy::CreateBarangayPayload,
            models::tenancy::UpdateBarangayPayload,

            // --- Users ---
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,
            models::user::RejectUserPayload,

            // --- Residents & households ---
            models::resident::ResidentStatus,
            models::resident::Gender,
            models::resident::CivilStatus,
            models::resident::Resident,
            models::resident::CreateResidentPayload,
            models::resident::UpdateResidentPayload,
            models::household::Household,
            models::household::HouseholdDetail,
            models::household::CreateHouseholdPayload,
            models::household::UpdateHouseholdPayload,

            // --- Businesses & permits ---
            models::business::BusinessStatus,
            models::business::Business,
            models::business::CreateBusinessPayload,
            models::business::UpdateBusinessPayload,
            models::permit::PermitStatus,
            models::permit::Permit,
            models::permit::CreatePermitPayload,
            models::permit::UpdatePermitPayload,
            models::permit::UpdatePermitStatusPayload,

            // --- Documents ---
            models::document::DocumentType,
            models::document::DocumentStatus,
            models::document::Document,
            models::document::CreateDocumentPayload,
            models::document::UpdateDocumentPayload,
            models::document::UpdateDocumentStatusPayload,

            // --- Incidents ---
            models::incident::IncidentStatus,
            models::incident::Incident,
            models::incident::CreateIncidentPayload,
            models::incident::UpdateIncidentPayload,

            // --- Community ---
            models::official::OfficialStatus,
            models::official::Official,
            models::official::CreateOfficialPayload,
            models::official::UpdateOfficialPayload,
            models::announcement::AnnouncementStatus,
            models::announcement::AnnouncementPriority,
            models::announcement::Announcement,
            models::announcement::CreateAnnouncementPayload,
            models::announcement::UpdateAnnouncementPayload,
            models::event::EventStatus,
            models::event::Event,
            models::event::CreateEventPayload,
            models::event::UpdateEventPayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
        )
    ),
    tags(
        (name = "Auth", description = "Sign-in, self-registration and tokens"),
        (name = "Barangays", description = "Barangays served by this deployment"),
        (name = "Users", description = "Accounts and registration approval"),
        (name = "Residents", description = "Resident registry"),
        (name = "Households", description = "Households and their members"),
        (name = "Businesses", description = "Business registry"),
        (name = "Permits", description = "Business permits"),
        (name = "Documents", description = "Clearances, certificates and other requests"),
        (name = "Incidents", description = "Blotter"),
        (name = "Officials", description = "Elected and appointed officials"),
        (name = "Announcements", description = "Public announcements"),
        (name = "Events", description = "Community events"),
        (name = "Dashboard", description = "Record counters")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_routes_are_documented_with_jwt() {
        let doc = ApiDoc::openapi();
        let residents = doc.paths.paths.get("/api/residents/{id}").expect("residents path");
        assert!(residents.get.is_some());
        assert!(residents.delete.is_some());
        assert!(doc.paths.paths.contains_key("/api/permits/{id}/status"));
        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("api_jwt"));
    }
}
