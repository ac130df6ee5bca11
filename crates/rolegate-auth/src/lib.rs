//! # rolegate-auth
//!
//! Authentication and authorization core for Rolegate.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and verification
//! - `jwt` — signed access and refresh token encoding and decoding
//! - `rbac` — role graph resolution, permission enforcement, and the default catalogue
//! - `session` — register/login/refresh/logout flows and bearer session resolution

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, TokenCodec, TokenKind, TokenPair};
pub use password::PasswordHasher;
pub use rbac::{RbacEnforcer, permissions_of, roles_of};
pub use session::{AuthSession, AuthenticationService, SessionResolver};
