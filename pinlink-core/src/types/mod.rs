//! Core layer type definitions

mod deploy;
mod domain;
mod settings;

pub use deploy::{BindOutcome, DeployOutcome, DeployRequest, ImportOutcome};
pub use domain::{BindResult, DomainDescriptor};
pub use settings::{DEFAULT_POLL_INTERVAL, DeploySettings, ExportSettings};

// Re-export the provider types the services hand back to callers
pub use pinlink_provider::{Credential, ExportStatus, ExportTask, UploadKind, UploadReceipt};
