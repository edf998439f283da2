//! Static role-to-permission table.

use std::collections::{BTreeSet, HashMap};

/// List every catalog item.
pub const LIST_ITEMS: &str = "get list items";
/// Read one catalog item.
pub const ITEM_DETAILS: &str = "get item details";
/// Provision a new user account.
pub const CREATE_USER: &str = "create user";

pub const ROLE_SUPER_ADMIN: &str = "Super Admin";
pub const ROLE_ADMIN: &str = "Admin";

/// Built-in grants: permission name and the roles authorized for it.
pub const DEFAULT_GRANTS: &[(&str, &[&str])] = &[
    (LIST_ITEMS, &[ROLE_SUPER_ADMIN]),
    (ITEM_DETAILS, &[ROLE_SUPER_ADMIN, ROLE_ADMIN]),
    (CREATE_USER, &[ROLE_SUPER_ADMIN]),
];

/// Immutable mapping of permission name to authorized role names.
///
/// Role names match by exact string equality. Both directions are indexed at
/// construction; the table never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    roles_by_permission: HashMap<String, BTreeSet<String>>,
    permissions_by_role: HashMap<String, BTreeSet<String>>,
}

impl PermissionTable {
    /// Build a table from `(permission, roles)` grants. Repeated permissions merge.
    pub fn new<I, P, R, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = (P, R)>,
        P: Into<String>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles_by_permission: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut permissions_by_role: HashMap<String, BTreeSet<String>> = HashMap::new();

        for (permission, roles) in grants {
            let permission = permission.into();
            let entry = roles_by_permission.entry(permission.clone()).or_default();
            for role in roles {
                let role = role.into();
                permissions_by_role
                    .entry(role.clone())
                    .or_default()
                    .insert(permission.clone());
                entry.insert(role);
            }
        }

        Self {
            roles_by_permission,
            permissions_by_role,
        }
    }

    /// The built-in POS grants.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_GRANTS.iter().map(|(p, roles)| (*p, roles.iter().copied())))
    }

    /// Roles authorized for `permission`; empty when the permission is unknown.
    pub fn roles_for(&self, permission: &str) -> BTreeSet<&str> {
        self.roles_by_permission
            .get(permission)
            .map(|roles| roles.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Permissions granted to `role`; empty when the role has no grants.
    pub fn permissions_for(&self, role: &str) -> BTreeSet<&str> {
        self.permissions_by_role
            .get(role)
            .map(|perms| perms.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether `role` is authorized for `permission`. Unknown names fail closed.
    pub fn allows(&self, role: &str, permission: &str) -> bool {
        self.roles_by_permission
            .get(permission)
            .is_some_and(|roles| roles.contains(role))
    }
}
