//! Pinning service client

mod api;
mod common;
mod error;
mod http;
mod types;
mod upload;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Client;

use crate::error::{RemoteError, Result};
use crate::types::Credential;

use common::{create_http_client, create_transfer_client};

pub const DEFAULT_API_BASE: &str = "https://pinme.dev/api/v3";

/// Shown once when the service stops accepting the stored credential.
pub const REMEDIATION_HINT: &str =
    "Your login has expired or is no longer valid. Run `pinlink login` to sign in again.";

const DEFAULT_AVAILABILITY_PATH: &str = "/check_domain";
const DEFAULT_AVAILABILITY_FALLBACK_PATH: &str = "/domain/check";

/// Endpoint configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without trailing slash.
    pub api_base: String,
    /// Availability probe path tried first.
    pub availability_path: String,
    /// Availability probe path tried when the first one gives no usable answer.
    pub availability_fallback_path: String,
    /// Device identifier sent with uploads, if bound.
    pub device_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            availability_path: DEFAULT_AVAILABILITY_PATH.to_string(),
            availability_fallback_path: DEFAULT_AVAILABILITY_FALLBACK_PATH.to_string(),
            device_id: None,
        }
    }
}

/// Sink for the expired-credential remediation hint.
pub trait ExpiryHint: Send + Sync {
    fn show(&self, error: &RemoteError);
}

/// Default hint sink: writes the hint through the log facade.
pub struct LogExpiryHint;

impl ExpiryHint for LogExpiryHint {
    fn show(&self, error: &RemoteError) {
        log::warn!("{REMEDIATION_HINT} ({error})");
    }
}

/// Pinning service client
///
/// All endpoint responses pass through [`PinningClient::fail`], the single place where
/// expired credentials are detected and the hint is emitted.
pub struct PinningClient {
    pub(crate) client: Client,
    pub(crate) transfer_client: Client,
    pub(crate) config: ClientConfig,
    pub(crate) credential: Option<Credential>,
    hint: Arc<dyn ExpiryHint>,
    hint_shown: AtomicBool,
}

impl PinningClient {
    pub fn new(mut config: ClientConfig, credential: Option<Credential>) -> Result<Self> {
        config.api_base = config.api_base.trim_end_matches('/').to_string();
        Ok(Self {
            client: create_http_client()?,
            transfer_client: create_transfer_client()?,
            config,
            credential,
            hint: Arc::new(LogExpiryHint),
            hint_shown: AtomicBool::new(false),
        })
    }

    /// Replace the hint sink (the CLI prints to the terminal).
    #[must_use]
    pub fn with_expiry_hint(mut self, hint: Arc<dyn ExpiryHint>) -> Self {
        self.hint = hint;
        self
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.config.api_base)
        } else {
            format!("{}/{path}", self.config.api_base)
        }
    }

    /// Emit the remediation hint, at most once per client.
    pub(crate) fn emit_expiry_hint(&self, error: &RemoteError) {
        if !self.hint_shown.swap(true, Ordering::SeqCst) {
            self.hint.show(error);
        }
    }
}
