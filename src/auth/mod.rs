//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Password hashing and login
//! - Signed token issuance and validation
//! - The access guard and the AuthedUser extractor for protected routes

pub mod error;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod token;

#[cfg(test)]
mod tests;

pub use error::{AuthError, IdentityField};
pub use extractors::AuthedUser;
pub use guard::AccessGuard;
pub use routes::auth_routes;
pub use token::{Token, TokenService};
