//! HTTP client construction

use std::time::Duration;

use reqwest::Client;

use crate::error::{RemoteError, Result};

/// Connection timeout (seconds)
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Whole-request timeout for JSON endpoints (seconds)
const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("pinlink/", env!("CARGO_PKG_VERSION"));

/// Client for JSON endpoints, with connection and request timeouts.
pub fn create_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| RemoteError::NetworkError {
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Client for uploads and archive downloads.
///
/// Only the connection is time-bounded; transfers may take as long as they need.
pub fn create_transfer_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| RemoteError::NetworkError {
            detail: format!("Failed to create transfer client: {e}"),
        })
}
