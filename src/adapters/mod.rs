// Adapters layer: concrete clients for the two platform APIs plus local
// filesystem storage for the cache files.

pub mod mastodon;
pub mod storage;
pub mod twitter;

use crate::utils::error::{MigrateError, Result};

/// Maps a non-2xx response to a typed error carrying the response body.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_else(|_| String::new());
    Err(MigrateError::ApiStatusError {
        status: status.as_u16(),
        message,
    })
}
