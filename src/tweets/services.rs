use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

use super::models::{Tweet, TweetCreate, TweetListResponse, TweetUpdate};
use super::validators::{normalize_paging, MAX_TWEET_LENGTH};
use crate::common::{truncate_chars, ApiError, Validator};
use crate::services::Corrector;

const TWEET_COLUMNS: &str =
    "id, user_id, original_text, corrected_text, explanation, created_at, updated_at";

pub struct TweetsService {
    db: SqlitePool,
    corrector: Arc<dyn Corrector>,
}

impl TweetsService {
    pub fn new(db: SqlitePool, corrector: Arc<dyn Corrector>) -> Self {
        Self { db, corrector }
    }

    /// Newest-first page of the caller's tweets
    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<TweetListResponse, ApiError> {
        let (page, page_size) = normalize_paging(page, page_size);
        // Pages past what SQLite can address are empty rather than wrapped
        let offset = (page - 1)
            .checked_mul(page_size)
            .and_then(|o| i64::try_from(o).ok());

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tweets WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        let tweets = match offset {
            Some(offset) => {
                sqlx::query_as::<_, Tweet>(&format!(
                    r#"SELECT {TWEET_COLUMNS}
                    FROM tweets
                    WHERE user_id = ?
                    ORDER BY created_at DESC, id DESC
                    LIMIT ? OFFSET ?"#
                ))
                .bind(user_id)
                .bind(page_size as i64)
                .bind(offset)
                .fetch_all(&self.db)
                .await?
            }
            None => Vec::new(),
        };

        debug!(
            user_id = user_id,
            tweet_count = tweets.len(),
            total = total,
            page = page,
            page_size = page_size,
            "Loaded tweet page"
        );

        Ok(TweetListResponse {
            tweets,
            total: total as usize,
            page,
            page_size,
        })
    }

    /// Get a tweet owned by `user_id`
    ///
    /// Another user's tweet is reported as not found.
    pub async fn get(&self, user_id: i64, tweet_id: i64) -> Result<Tweet, ApiError> {
        sqlx::query_as::<_, Tweet>(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE id = ? AND user_id = ?"
        ))
        .bind(tweet_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_string()))
    }

    /// Store a new tweet along with its correction
    pub async fn create(&self, user_id: i64, request: TweetCreate) -> Result<Tweet, ApiError> {
        request.validate().into_result()?;

        let original_text = request.original_text.trim().to_string();
        let correction = self.corrector.correct(&original_text).await;
        let corrected_text = truncate_chars(&correction.corrected_text, MAX_TWEET_LENGTH);
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO tweets (user_id, original_text, corrected_text, explanation, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&original_text)
        .bind(&corrected_text)
        .bind(&correction.explanation)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        let tweet_id = result.last_insert_rowid();
        info!(user_id = user_id, tweet_id = tweet_id, "Created tweet");

        self.get(user_id, tweet_id).await
    }

    pub async fn update(
        &self,
        user_id: i64,
        tweet_id: i64,
        request: TweetUpdate,
    ) -> Result<Tweet, ApiError> {
        request.validate().into_result()?;
        let existing = self.get(user_id, tweet_id).await?;

        let original_text = request.original_text.trim().to_string();
        let (corrected_text, explanation) = match request.corrected_text {
            Some(corrected) => (Some(corrected), request.explanation),
            None if original_text != existing.original_text => {
                let correction = self.corrector.correct(&original_text).await;
                (
                    Some(truncate_chars(&correction.corrected_text, MAX_TWEET_LENGTH)),
                    Some(correction.explanation),
                )
            }
            None => (
                existing.corrected_text,
                request.explanation.or(existing.explanation),
            ),
        };

        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            UPDATE tweets
            SET original_text = ?, corrected_text = ?, explanation = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&original_text)
        .bind(&corrected_text)
        .bind(&explanation)
        .bind(&now)
        .bind(tweet_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        info!(user_id = user_id, tweet_id = tweet_id, "Updated tweet");

        self.get(user_id, tweet_id).await
    }

    pub async fn delete(&self, user_id: i64, tweet_id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = ? AND user_id = ?")
            .bind(tweet_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Tweet not found".to_string()));
        }

        info!(user_id = user_id, tweet_id = tweet_id, "Deleted tweet");
        Ok(())
    }
}
