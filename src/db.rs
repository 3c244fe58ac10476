pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::BarangayRepository;
pub mod resident_repo;
pub use resident_repo::ResidentRepository;
pub mod household_repo;
pub use household_repo::HouseholdRepository;
pub mod business_repo;
pub use business_repo::BusinessRepository;
pub mod permit_repo;
pub use permit_repo::PermitRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod incident_repo;
pub use incident_repo::IncidentRepository;
pub mod official_repo;
pub use official_repo::OfficialRepository;
pub mod announcement_repo;
pub use announcement_repo::AnnouncementRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
