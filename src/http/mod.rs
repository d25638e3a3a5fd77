//! HTTP client module with response classification and read retries.

mod client;
mod retry;

pub use client::HttpClient;
pub use retry::{ApiError, MAX_RETRIES, RETRY_DELAY_MS, ServerError, check_response, classify_status};
