//! Public data types shared by the client and its callers.

use serde::{Deserialize, Serialize};

/// Credential presented to the pinning service.
///
/// Obtained once by the auth-storage collaborator and treated as immutable for the
/// lifetime of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Wallet/account address the token was issued for.
    pub address: String,
    /// Session token.
    pub token: String,
}

impl Credential {
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
        }
    }

    /// Both fields present and non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.token.trim().is_empty()
    }
}

/// Lifecycle state of a CAR export task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Processing,
    Completed,
    Failed,
}

impl ExportStatus {
    /// Map the service's status string. Unknown values are treated as still running.
    pub fn from_wire(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "completed" | "complete" | "success" | "succeeded" | "done" => Self::Completed,
            "failed" | "failure" | "error" => Self::Failed,
            _ => Self::Processing,
        }
    }

    /// `Completed` and `Failed` end the polling loop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Snapshot of a remote export task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTask {
    pub task_id: String,
    pub cid: String,
    pub status: ExportStatus,
    /// Present once the archive is ready.
    pub download_url: Option<String>,
    /// Present when the task failed.
    pub error_message: Option<String>,
}

/// What the upload transport is sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadKind {
    /// A regular file or directory tree.
    #[default]
    Content,
    /// A CAR archive the service unpacks, keeping its root CID.
    Archive,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Opaque content identifier; never parsed.
    pub content_hash: String,
}
