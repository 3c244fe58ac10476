// src/policy/roles.rs

use crate::models::auth::Role;

/// Role predicate a route declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    Authenticated,
    /// Every barangay official and employee, never residents.
    StaffOrAbove,
    AdminOrAbove,
    /// Admins plus the officials that handle money (permits and fees).
    Financial,
    SuperAdminOnly,
    OneOf(&'static [Role]),
}

impl RoleRequirement {
    pub fn allows(self, role: Role) -> bool {
        match self {
            RoleRequirement::Authenticated => true,
            RoleRequirement::StaffOrAbove => role != Role::Resident,
            RoleRequirement::AdminOrAbove => {
                matches!(role, Role::BarangayAdmin | Role::SuperAdmin)
            }
            RoleRequirement::Financial => matches!(
                role,
                Role::BarangayAdmin | Role::SuperAdmin | Role::Captain | Role::Treasurer
            ),
            RoleRequirement::SuperAdminOnly => role == Role::SuperAdmin,
            RoleRequirement::OneOf(roles) => roles.contains(&role),
        }
    }
}

/// Officials allowed to approve or reject resident self-registrations.
pub const APPROVERS: &[Role] = &[
    Role::SuperAdmin,
    Role::BarangayAdmin,
    Role::Captain,
    Role::Secretary,
];

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::BarangayAdmin,
        Role::Captain,
        Role::Secretary,
        Role::Treasurer,
        Role::Staff,
        Role::Resident,
    ];

    fn allowed(req: RoleRequirement) -> Vec<Role> {
        ALL.into_iter().filter(|r| req.allows(*r)).collect()
    }

    #[test]
    fn staff_or_above_excludes_only_residents() {
        let roles = allowed(RoleRequirement::StaffOrAbove);
        assert_eq!(roles.len(), 6);
        assert!(!roles.contains(&Role::Resident));
    }

    #[test]
    fn admin_or_above() {
        assert_eq!(
            allowed(RoleRequirement::AdminOrAbove),
            vec![Role::SuperAdmin, Role::BarangayAdmin]
        );
    }

    #[test]
    fn financial_adds_captain_and_treasurer() {
        assert_eq!(
            allowed(RoleRequirement::Financial),
            vec![Role::SuperAdmin, Role::BarangayAdmin, Role::Captain, Role::Treasurer]
        );
    }

    #[test]
    fn super_admin_only() {
        assert_eq!(allowed(RoleRequirement::SuperAdminOnly), vec![Role::SuperAdmin]);
    }

    #[test]
    fn explicit_list() {
        let req = RoleRequirement::OneOf(APPROVERS);
        assert!(req.allows(Role::Secretary));
        assert!(!req.allows(Role::Treasurer));
        assert!(!req.allows(Role::Staff));
    }

    #[test]
    fn any_authenticated_includes_residents() {
        assert_eq!(allowed(RoleRequirement::Authenticated).len(), ALL.len());
    }
}
