//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use pinlink_provider::RemoteError;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Deploy/import target does not exist
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Domain syntax or other input validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Account lacks the VIP tier required for domain binding
    #[error("Binding a domain requires VIP membership")]
    EntitlementDenied,

    /// Domain already taken
    #[error("Domain is not available: {0}")]
    DomainUnavailable(String),

    /// Upload transport failure
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Bind call failure (the upload stays valid)
    #[error("Domain binding failed: {0}")]
    BindFailed(String),

    /// The service rejected the stored credential; the hint has already been shown
    #[error("Credential expired")]
    CredentialExpired,

    /// Any other remote failure
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Export task failed or never produced an archive
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Operation needs a credential and none is stored
    #[error("Not logged in: run `pinlink login` first")]
    MissingCredential,

    /// Local file system error
    #[error("I/O error: {0}")]
    Io(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, remote rejection), used for log levels.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::PathNotFound(_)
            | Self::ValidationError(_)
            | Self::EntitlementDenied
            | Self::DomainUnavailable(_)
            | Self::CredentialExpired
            | Self::MissingCredential => true,
            Self::UploadFailed(_)
            | Self::BindFailed(_)
            | Self::RemoteError(_)
            | Self::ExportFailed(_)
            | Self::Io(_) => false,
        }
    }

    /// Expired credential is reported once at the client and never again.
    #[must_use]
    pub fn is_credential_expired(&self) -> bool {
        matches!(self, Self::CredentialExpired)
    }
}

impl From<RemoteError> for CoreError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::CredentialExpired { .. } => Self::CredentialExpired,
            RemoteError::LocalIo { detail } => Self::Io(detail),
            other => Self::RemoteError(other.to_string()),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_remote_error_maps_to_credential_expired() {
        let err: CoreError = RemoteError::CredentialExpired {
            raw_message: Some("token expired".into()),
        }
        .into();
        assert_eq!(err, CoreError::CredentialExpired);
    }

    #[test]
    fn other_remote_errors_collapse_to_remote_error() {
        let err: CoreError = RemoteError::Api {
            status: Some(500),
            raw_code: None,
            raw_message: "boom".into(),
        }
        .into();
        assert_eq!(err, CoreError::RemoteError("HTTP 500: boom".into()));
    }

    #[test]
    fn entitlement_denied_message() {
        assert_eq!(
            CoreError::EntitlementDenied.to_string(),
            "Binding a domain requires VIP membership"
        );
    }
}
