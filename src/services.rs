pub mod auth;
pub mod business_service;
pub mod community_service;
pub mod dashboard_service;
pub mod document_service;
pub mod incident_service;
pub mod notification;
pub mod resident_service;
pub mod tenancy_service;
pub mod user_service;
