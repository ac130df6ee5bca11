//! Session flows: credential exchange, refresh rotation, and bearer resolution.

pub mod resolver;
pub mod service;

pub use resolver::SessionResolver;
pub use service::{AuthSession, AuthenticationService};
