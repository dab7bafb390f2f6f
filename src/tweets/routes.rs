use super::handlers;
use axum::{routing::get, Router};

/// Creates the tweets router; every route requires a bearer token
pub fn tweets_routes() -> Router {
    Router::new()
        .route(
            "/api/v1/tweets/",
            get(handlers::list_tweets).post(handlers::create_tweet),
        )
        .route(
            "/api/v1/tweets",
            get(handlers::list_tweets).post(handlers::create_tweet),
        )
        .route(
            "/api/v1/tweets/:id",
            get(handlers::get_tweet)
                .put(handlers::update_tweet)
                .delete(handlers::delete_tweet),
        )
}
