use super::models::{TweetCreate, TweetUpdate};
use crate::common::{ValidationResult, Validator};

pub const MAX_TWEET_LENGTH: usize = 280;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

fn check_text(result: &mut ValidationResult, field: &str, text: &str) {
    if text.trim().is_empty() {
        result.add_error(field, "Text is required");
    } else if text.trim().chars().count() > MAX_TWEET_LENGTH {
        result.add_error(field, "Text must not exceed 280 characters");
    }
}

impl Validator for TweetCreate {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_text(&mut result, "original_text", &self.original_text);
        result
    }
}

impl Validator for TweetUpdate {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_text(&mut result, "original_text", &self.original_text);

        if let Some(corrected) = &self.corrected_text {
            if corrected.chars().count() > MAX_TWEET_LENGTH {
                result.add_error("corrected_text", "Text must not exceed 280 characters");
            }
        }

        result
    }
}

/// Normalizes paging input: pages start at 1, size is clamped to 1..=100
pub fn normalize_paging(page: Option<usize>, page_size: Option<usize>) -> (usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}
