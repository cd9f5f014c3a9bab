use serde::{Deserialize, Serialize};

/// Unified error type for all pinning service operations.
///
/// Every failure shape the service produces (HTTP status, envelope code, free-text message)
/// is normalized into one of these variants by the client before it reaches a caller.
/// Only [`CredentialExpired`](Self::CredentialExpired) carries policy weight: callers must
/// abort the current command without issuing further remote calls. The remaining variants
/// are a generic remote failure split by origin for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum RemoteError {
    /// The stored credential is no longer accepted by the service.
    ///
    /// The remediation hint has already been shown when this variant is returned.
    CredentialExpired {
        /// Original message from the service, if available.
        raw_message: Option<String>,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// Failed to parse the service response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// The service rejected the request for a reason other than authentication.
    Api {
        /// HTTP status code, if the failure came from a non-2xx response.
        status: Option<u16>,
        /// Service-specific error code, if present in the response envelope.
        raw_code: Option<String>,
        /// Message returned by the service.
        raw_message: String,
    },

    /// Reading a local file or writing a downloaded archive failed.
    LocalIo {
        /// Error details.
        detail: String,
    },
}

impl RemoteError {
    /// Whether this is the distinguished expired-credential condition.
    #[must_use]
    pub fn is_credential_expired(&self) -> bool {
        matches!(self, Self::CredentialExpired { .. })
    }

    /// Whether this is expected behavior (user input, remote rejection), used for log levels.
    ///
    /// Return `true` means log at `warn`, `false` means log at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::CredentialExpired { .. } | Self::Api { .. })
    }

    /// Human-readable message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::CredentialExpired { raw_message } => {
                raw_message.as_deref().unwrap_or("credential expired")
            }
            Self::NetworkError { detail }
            | Self::Timeout { detail }
            | Self::ParseError { detail }
            | Self::LocalIo { detail } => detail,
            Self::Api { raw_message, .. } => raw_message,
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialExpired { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Credential expired: {msg}")
                } else {
                    write!(f, "Credential expired")
                }
            }
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::Api {
                status,
                raw_code,
                raw_message,
            } => match (status, raw_code) {
                (_, Some(code)) => write!(f, "[{code}] {raw_message}"),
                (Some(status), None) => write!(f, "HTTP {status}: {raw_message}"),
                (None, None) => write!(f, "{raw_message}"),
            },
            Self::LocalIo { detail } => write!(f, "I/O error: {detail}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Convenience type alias for `Result<T, RemoteError>`.
pub type Result<T> = std::result::Result<T, RemoteError>;
