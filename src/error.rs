// Error types for the uplift crate.
// Handles GitHub API errors, seen-store errors, and page precondition failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpliftError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Repository {owner}/{repo} has no commits")]
    EmptyHistory { owner: String, repo: String },

    #[error("Page metadata missing or malformed: {0}")]
    MissingMetadata(String),

    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, UpliftError>;
