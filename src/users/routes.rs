use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the users router
///
/// # Routes
/// - `POST /api/v1/users/` - Registration
/// - `GET /api/v1/users/me` - Current user
/// - `PATCH /api/v1/users/me` - Update password or active flag
pub fn users_routes() -> Router {
    Router::new()
        .route("/api/v1/users/", post(handlers::create_user))
        .route("/api/v1/users", post(handlers::create_user))
        .route(
            "/api/v1/users/me",
            get(handlers::read_current_user).patch(handlers::update_current_user),
        )
}
