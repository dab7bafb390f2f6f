//! # Tweets Module
//!
//! This module handles the user-owned tweet resource:
//! - Tweet CRUD scoped to the authenticated user
//! - Correction of new or edited text through the correction service

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::tweets_routes;
