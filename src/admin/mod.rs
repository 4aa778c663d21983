//! Administration registries
//!
//! Database connections the portal documents and the accounts allowed to
//! use it.

pub mod connection;
pub mod user;

pub use connection::{ConnectionRegistry, ConnectionStatus, DatabaseConnection};
pub use user::{PortalUser, UserRegistry, UserRole, UserStatus};
