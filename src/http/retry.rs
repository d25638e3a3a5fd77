//! Response classification and retry policy for GitHub API calls.

use anyhow::Result;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

/// Maximum number of attempts for idempotent reads.
pub const MAX_RETRIES: usize = 3;

/// Delay between retry attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// A failed API call that will not succeed when repeated.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Rate limit exceeded (HTTP 403 with rate limit message or 429)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Other client errors, e.g. 422 when a tag already exists
    ClientError(u16, String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::RateLimitExceeded(msg) => {
                write!(f, "Rate limit exceeded: {}. Try again later.", msg)
            }
            ApiError::AuthenticationFailed(msg) => {
                write!(
                    f,
                    "Authentication failed: {}. Check the token in your API token file.",
                    msg
                )
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Forbidden(msg) => {
                write!(f, "Access forbidden: {}. The token may lack push access.", msg)
            }
            ApiError::ClientError(status, msg) => write!(f, "Request error (HTTP {}): {}", status, msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// A 5xx response; reads may retry these.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    pub status: u16,
    pub message: String,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Server error (HTTP {}): {}", self.status, self.message)
    }
}

impl std::error::Error for ServerError {}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Classifies a non-success status into an [`ApiError`].
/// Returns `None` for statuses worth retrying (5xx and anything unexpected).
pub fn classify_status(status: StatusCode, message: &str) -> Option<ApiError> {
    let message = message.to_string();
    match status {
        StatusCode::UNAUTHORIZED => Some(ApiError::AuthenticationFailed(message)),
        StatusCode::FORBIDDEN => {
            if message.to_lowercase().contains("rate limit") {
                Some(ApiError::RateLimitExceeded(message))
            } else {
                Some(ApiError::Forbidden(message))
            }
        }
        StatusCode::TOO_MANY_REQUESTS => Some(ApiError::RateLimitExceeded(message)),
        StatusCode::NOT_FOUND => Some(ApiError::NotFound(message)),
        s if s.is_client_error() => Some(ApiError::ClientError(s.as_u16(), message)),
        _ => None,
    }
}

/// Passes successful responses through and turns failures into typed errors,
/// keeping GitHub's `message` field when the body carries one.
pub async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

    match classify_status(status, &message) {
        Some(api_error) => Err(anyhow::Error::from(api_error)),
        None => Err(anyhow::Error::from(ServerError {
            status: status.as_u16(),
            message,
        })),
    }
}

/// Checks if an error is worth another attempt.
pub fn is_retryable_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ApiError>().is_none()
}
