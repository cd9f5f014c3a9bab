//! Generic HTTP request helpers
//!
//! Sending, transport-error mapping, response logging and JSON parsing live here so the
//! endpoint methods only deal with request construction and envelope handling.
//!
//! No retries are performed: every command issues its calls strictly in sequence and a
//! failed call ends that step.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::RemoteError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `method_name` - request method name (for logging)
    /// * `url` - request URL (for logging)
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` - for any HTTP status except gateway failures
    /// * `Err(RemoteError::Timeout | RemoteError::NetworkError)` - transport failure
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), RemoteError> {
        log::debug!("{method_name} {url}");

        let response = request_builder.send().await.map_err(transport_error)?;

        let status_code = response.status().as_u16();
        log::debug!("Response Status: {status_code}");

        // Gateway failures carry HTML bodies that never match the service envelope
        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Server error (HTTP {status_code}) for {url}");
            return Err(RemoteError::NetworkError {
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| RemoteError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("Response Body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(RemoteError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!("Raw response: {}", truncate_for_log(response_text));
            RemoteError::ParseError {
                detail: e.to_string(),
            }
        })
    }
}

/// Map a `reqwest` send failure to the transport variants.
pub(crate) fn transport_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout {
            detail: e.to_string(),
        }
    } else {
        RemoteError::NetworkError {
            detail: e.to_string(),
        }
    }
}
