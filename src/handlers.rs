pub mod announcements;
pub mod auth;
pub mod businesses;
pub mod dashboard;
pub mod documents;
pub mod events;
pub mod households;
pub mod incidents;
pub mod officials;
pub mod permits;
pub mod residents;
pub mod tenancy;
pub mod users;
