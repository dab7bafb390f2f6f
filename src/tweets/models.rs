use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tweet {
    pub id: i64,
    pub user_id: i64,
    pub original_text: String,
    pub corrected_text: Option<String>,
    pub explanation: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct TweetCreate {
    pub original_text: String,
}

/// Full replacement of a tweet's text
///
/// Leaving `corrected_text` out asks for a fresh correction when the text changed.
#[derive(Debug, Deserialize)]
pub struct TweetUpdate {
    pub original_text: String,
    pub corrected_text: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TweetListQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

// Paginated tweet list response
#[derive(Serialize, Deserialize, Debug)]
pub struct TweetListResponse {
    pub tweets: Vec<Tweet>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
