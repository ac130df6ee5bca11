//! Role graph resolution and permission enforcement.

pub mod catalog;
pub mod enforcer;
pub mod graph;

pub use catalog::{
    DEFAULT_PERMISSIONS, DEFAULT_ROLES, PermissionSpec, RoleSpec, SeedReport, seed_default_catalog,
};
pub use enforcer::RbacEnforcer;
pub use graph::{permissions_of, roles_of};
