pub mod roles;
pub use roles::RoleRequirement;
pub mod scope;
pub use scope::TenantScope;
pub mod routes;
pub use routes::{RoutePolicy, ScopeMode};
pub mod sequence;
pub use sequence::{CodeRequest, CodeSeries};
