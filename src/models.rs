pub mod announcement;
pub mod auth;
pub mod business;
pub mod dashboard;
pub mod document;
pub mod event;
pub mod household;
pub mod incident;
pub mod official;
pub mod permit;
pub mod resident;
pub mod tenancy;
pub mod user;
