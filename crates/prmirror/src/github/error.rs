//! GitHub API error types and status mapping.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("Rate limit exceeded{}", reset_display(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Server error: HTTP {status}")]
    Server { status: u16 },
}

fn reset_display(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(". Resets at {at}"),
        None => String::new(),
    }
}

/// Extract the HTTP status code from an octocrab error, if it carries one.
pub fn status_of(e: &octocrab::Error) -> Option<u16> {
    match e {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Map an octocrab error onto the prmirror taxonomy.
///
/// 401 means the credentials are bad; 403/429 means the caller is being
/// throttled (GitHub reports primary rate limiting as 403); 5xx is a
/// server-side failure that only poisons the current item.
pub fn map_remote_error(e: octocrab::Error) -> GitHubError {
    match status_of(&e) {
        Some(401) => GitHubError::AuthRequired,
        Some(403) | Some(429) => GitHubError::RateLimited { reset_at: None },
        Some(status) if (500..=599).contains(&status) => GitHubError::Server { status },
        _ => GitHubError::Api(e),
    }
}
