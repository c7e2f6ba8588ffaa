use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// Roles a user can hold. Staff roles carry unconditional content access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
pub enum Role {
    Customer,
    Uploader,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Uploader => "Uploader",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    pub fn parse(name: &str) -> Option<Role> {
        match name {
            "Customer" => Some(Role::Customer),
            "Uploader" => Some(Role::Uploader),
            "Admin" => Some(Role::Admin),
            "SuperAdmin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Uploader | Role::Admin | Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of roles held by one user, loaded from the user_roles table or
/// decoded from JWT claims. Capability checks go through this type rather
/// than comparing role strings at call sites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: BTreeSet<Role>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown role names are ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            roles: names
                .into_iter()
                .filter_map(|n| Role::parse(n.as_ref()))
                .collect(),
        }
    }

    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role);
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_staff(&self) -> bool {
        self.roles.iter().any(|r| r.is_staff())
    }

    pub fn is_admin(&self) -> bool {
        self.contains(Role::Admin) || self.contains(Role::SuperAdmin)
    }

    pub fn is_super_admin(&self) -> bool {
        self.contains(Role::SuperAdmin)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert!(!Role::Customer.is_staff());
        assert!(Role::Uploader.is_staff());
        assert!(Role::Admin.is_staff());
        assert!(Role::SuperAdmin.is_staff());
    }

    #[test]
    fn test_role_set_from_names_ignores_unknown() {
        let set = RoleSet::from_names(["Customer", "Moderator", "Admin"]);
        assert!(set.contains(Role::Customer));
        assert!(set.contains(Role::Admin));
        assert_eq!(set.names(), vec!["Customer".to_string(), "Admin".to_string()]);
    }

    #[test]
    fn test_role_set_capabilities() {
        let customer = RoleSet::from_names(["Customer"]);
        assert!(!customer.is_staff());
        assert!(!customer.is_admin());

        let uploader = RoleSet::from_names(["Uploader"]);
        assert!(uploader.is_staff());
        assert!(!uploader.is_admin());

        let super_admin = RoleSet::from_names(["SuperAdmin"]);
        assert!(super_admin.is_staff());
        assert!(super_admin.is_admin());
        assert!(super_admin.is_super_admin());
    }
}
