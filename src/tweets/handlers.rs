use super::models::{MessageResponse, TweetCreate, TweetListQuery, TweetUpdate};
use super::services::TweetsService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

fn service(state: &AppState) -> TweetsService {
    TweetsService::new(state.db.clone(), state.corrector.clone())
}

/// GET /api/v1/tweets/ - Paginated tweets of the current user
pub async fn list_tweets(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Query(query): Query<TweetListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tweets = service(&state)
        .list_for_user(user.id, query.page, query.page_size)
        .await?;

    Ok(Json(tweets))
}

/// POST /api/v1/tweets/ - Create a tweet and store its correction
pub async fn create_tweet(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Json(request): Json<TweetCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let tweet = service(&state).create(user.id, request).await?;

    Ok((StatusCode::CREATED, Json(tweet)))
}

/// GET /api/v1/tweets/:id
pub async fn get_tweet(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(tweet_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tweet = service(&state).get(user.id, tweet_id).await?;

    Ok(Json(tweet))
}

/// PUT /api/v1/tweets/:id
pub async fn update_tweet(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(tweet_id): Path<i64>,
    Json(request): Json<TweetUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let tweet = service(&state).update(user.id, tweet_id, request).await?;

    Ok(Json(tweet))
}

/// DELETE /api/v1/tweets/:id
pub async fn delete_tweet(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(tweet_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    service(&state).delete(user.id, tweet_id).await?;

    Ok(Json(MessageResponse {
        message: "Tweet deleted successfully".to_string(),
    }))
}
