//! Business logic service layer

mod deploy_service;
mod entitlement_service;
mod import_export_service;

pub use deploy_service::DeployService;
pub use entitlement_service::EntitlementService;
pub use import_export_service::ImportExportService;

use std::sync::Arc;

use pinlink_provider::RemoteError;

use crate::crypto::obfuscate;
use crate::error::{CoreError, CoreResult};
use crate::traits::{ContentUploader, PinningApi, Reporter};
use crate::types::{Credential, DeploySettings, ExportSettings};

/// Service context - holds all dependencies
///
/// The front end builds this once per invocation with the concrete client,
/// uploader and reporter.
pub struct ServiceContext {
    /// Pinning service API
    pub api: Arc<dyn PinningApi>,
    /// Upload transport
    pub uploader: Arc<dyn ContentUploader>,
    /// User-facing output
    pub reporter: Arc<dyn Reporter>,
    /// Stored credential, read once at startup
    pub credential: Option<Credential>,
    pub deploy: DeploySettings,
    pub export: ExportSettings,
}

impl ServiceContext {
    /// Create a service context with default settings
    #[must_use]
    pub fn new(
        api: Arc<dyn PinningApi>,
        uploader: Arc<dyn ContentUploader>,
        reporter: Arc<dyn Reporter>,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            api,
            uploader,
            reporter,
            credential,
            deploy: DeploySettings::default(),
            export: ExportSettings::default(),
        }
    }

    #[must_use]
    pub fn with_deploy_settings(mut self, deploy: DeploySettings) -> Self {
        self.deploy = deploy;
        self
    }

    #[must_use]
    pub fn with_export_settings(mut self, export: ExportSettings) -> Self {
        self.export = export;
        self
    }

    /// Stored credential, or `MissingCredential`
    pub fn require_credential(&self) -> CoreResult<&Credential> {
        self.credential
            .as_ref()
            .filter(|c| c.is_complete())
            .ok_or(CoreError::MissingCredential)
    }

    /// Preview link for a content hash
    #[must_use]
    pub fn preview_url(&self, content_hash: &str) -> String {
        let token = obfuscate(
            content_hash,
            self.deploy.shared_secret.as_deref(),
            self.deploy.device_id.as_deref(),
        );
        self.deploy.preview_url(&token)
    }

    /// Report an error at the point it was detected and hand it back.
    ///
    /// An expired credential was already announced by the client, so it passes through silently.
    pub fn abort(&self, err: CoreError) -> CoreError {
        if err.is_credential_expired() {
            log::debug!("Aborting: credential expired");
            return err;
        }
        if err.is_expected() {
            log::warn!("{err}");
        } else {
            log::error!("{err}");
        }
        self.reporter.failure(&err.to_string());
        err
    }

    /// Map a remote failure of one step into the step's error kind.
    pub fn step_error(err: RemoteError, wrap: impl FnOnce(String) -> CoreError) -> CoreError {
        if err.is_credential_expired() {
            CoreError::CredentialExpired
        } else {
            wrap(err.to_string())
        }
    }
}
