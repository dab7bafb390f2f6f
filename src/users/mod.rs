//! # Users Module
//!
//! Registration, the current-user endpoints and the credential store.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;


pub use models::User;
pub use routes::users_routes;
pub use store::UserStore;
