use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExportTask, UploadKind, UploadReceipt};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status, when the failure came from a non-2xx response
    pub status: Option<u16>,
    /// Service envelope code, if any
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(status: Option<u16>, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

/// Pinning service endpoints.
///
/// Every method returns either the typed payload or a normalized [`RemoteError`](crate::RemoteError).
/// Implementations attach the stored credential to each request.
#[async_trait]
pub trait PinningApi: Send + Sync {
    /// Whether `name` can be bound.
    ///
    /// Best-effort: ambiguous probes resolve to `true`, leaving the authoritative
    /// decision to the bind call. Only an expired credential is reported as an error.
    async fn check_domain_available(&self, name: &str) -> Result<bool>;

    /// Bind `name` under the service-owned subdomain suffix to `content_hash`.
    async fn bind_subdomain(&self, name: &str, content_hash: &str) -> Result<()>;

    /// Bind a user-owned DNS domain to `content_hash`.
    async fn bind_dns_domain(&self, domain: &str, content_hash: &str) -> Result<()>;

    /// Whether the account holds the VIP tier.
    async fn check_entitlement(&self) -> Result<bool>;

    /// Create a CAR export task for `cid`.
    async fn request_export(&self, cid: &str, uid: &str) -> Result<ExportTask>;

    /// Fetch the current state of an export task.
    async fn poll_export_status(&self, task_id: &str) -> Result<ExportTask>;

    /// Stream the archive at `url` into `dest`, returning the number of bytes written.
    async fn download_archive(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Content upload transport.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    /// Upload the file or directory at `path` and return its content hash.
    async fn upload(&self, path: &Path, kind: UploadKind) -> Result<UploadReceipt>;
}
