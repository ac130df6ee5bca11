//! Read-time resolution of a user's roles and effective permissions.

use std::collections::BTreeSet;

use rolegate_entity::user::UserWithRoles;

/// Names of the roles held by `user`, sorted.
pub fn roles_of(user: &UserWithRoles) -> Vec<String> {
    user.roles
        .iter()
        .map(|r| r.role.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Union of permission names across every role held by `user`, sorted
/// and deduplicated. A user without roles has no permissions.
pub fn permissions_of(user: &UserWithRoles) -> Vec<String> {
    user.roles
        .iter()
        .flat_map(|r| r.permissions.iter().map(|p| p.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
