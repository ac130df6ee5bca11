//! Role and permission reference data.

pub mod model;

pub use model::{NewPermission, NewRole, Permission, Role, RoleWithPermissions};
