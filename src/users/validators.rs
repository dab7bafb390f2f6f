use super::models::{UserCreate, UserUpdate};
use crate::common::{ValidationResult, Validator};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;

impl Validator for UserCreate {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        let username_len = self.username.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username_len) {
            result.add_error("username", "Username must be between 3 and 50 characters");
        } else if !is_valid_username(&self.username) {
            result.add_error(
                "username",
                "Username may only contain letters, digits, '_', '.' and '-'",
            );
        }

        if !is_valid_email(&self.email) {
            result.add_error("email", "A valid email address is required");
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            result.add_error("password", "Password must be at least 8 characters");
        }

        result
    }
}

impl Validator for UserUpdate {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(password) = &self.password {
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                result.add_error("password", "Password must be at least 8 characters");
            }
        }

        result
    }
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Plausibility check only: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}
