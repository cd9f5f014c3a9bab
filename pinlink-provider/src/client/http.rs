//! Pinning service HTTP request methods

use reqwest::{RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::RawApiError;
use crate::utils::log_sanitizer::truncate_for_log;

use super::PinningClient;
use super::types::{ApiEnvelope, code_to_string, error_message};

const ADDRESS_HEADER: &str = "X-Auth-Address";
const TOKEN_HEADER: &str = "X-Auth-Token";

impl PinningClient {
    /// Attach credential headers when a credential is held.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Some(credential) => request
                .header(ADDRESS_HEADER, &credential.address)
                .header(TOKEN_HEADER, &credential.token),
            None => request,
        }
    }

    /// Execute GET request and unwrap the envelope `data`
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.url(path);
        let request = self.authorize(self.client.get(&url));
        let (status, text) = HttpUtils::execute_request(request, "GET", &url).await?;
        self.unwrap_envelope(status, &text)
    }

    /// Execute POST request with a JSON body and unwrap the envelope `data`
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let url = self.url(path);
        if log::log_enabled!(log::Level::Debug) {
            let body_json = serde_json::to_string(body)
                .unwrap_or_else(|_| "<unserializable body>".to_string());
            log::debug!("Request Body: {}", truncate_for_log(&body_json));
        }
        let request = self.authorize(self.client.post(&url).json(body));
        let (status, text) = HttpUtils::execute_request(request, "POST", &url).await?;
        self.unwrap_envelope(status, &text)
    }

    /// Execute GET request and return the whole JSON body (for loosely shaped endpoints)
    pub(crate) async fn get_raw(&self, path: &str) -> Result<serde_json::Value> {
        let url = self.url(path);
        let request = self.authorize(self.client.get(&url));
        let (status, text) = HttpUtils::execute_request(request, "GET", &url).await?;
        self.check_status(status, &text)?;

        let body: serde_json::Value = HttpUtils::parse_json(&text)?;
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(body.clone()).map_err(Self::parse_error)?;
        if !envelope.is_success() {
            return Err(self.envelope_failure(status, envelope));
        }
        Ok(body)
    }

    /// Non-2xx responses become normalized errors.
    pub(crate) fn check_status(&self, status: u16, text: &str) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        Err(self.status_error(status, text))
    }

    /// Normalize a non-2xx response from the service.
    pub(crate) fn status_error(&self, status: u16, text: &str) -> crate::RemoteError {
        let body: Option<serde_json::Value> = serde_json::from_str(text).ok();
        let code = body
            .as_ref()
            .and_then(|b| b.get("code"))
            .and_then(code_to_string);
        let message = body.as_ref().and_then(error_message).unwrap_or_else(|| {
            if text.trim().is_empty() {
                String::new()
            } else {
                truncate_for_log(text)
            }
        });
        self.fail(RawApiError::new(Some(status), code, message))
    }

    /// Whether `url` shares scheme, host and port with the API base.
    pub(crate) fn is_service_url(&self, url: &str) -> bool {
        match (Url::parse(url), Url::parse(&self.config.api_base)) {
            (Ok(target), Ok(base)) => target.origin() == base.origin(),
            _ => false,
        }
    }

    /// Check status and envelope code, then decode `data`.
    pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        status: u16,
        text: &str,
    ) -> Result<Option<T>> {
        self.check_status(status, text)?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ApiEnvelope<serde_json::Value> = HttpUtils::parse_json(text)?;
        if !envelope.is_success() {
            return Err(self.envelope_failure(status, envelope));
        }

        match envelope.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(Self::parse_error),
        }
    }

    fn envelope_failure(
        &self,
        status: u16,
        envelope: ApiEnvelope<serde_json::Value>,
    ) -> crate::RemoteError {
        let code = envelope.code_string();
        let message = envelope
            .msg
            .unwrap_or_else(|| "Unknown error".to_string());
        self.fail(RawApiError::new(Some(status), code, message))
    }
}
