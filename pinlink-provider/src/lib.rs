//! # pinlink-provider
//!
//! Client library for the pinning service that backs `pinlink`.
//!
//! It covers three concerns:
//!
//! - **Authenticated endpoints**: domain availability, subdomain and DNS binding,
//!   VIP entitlement, and the CAR export task API ([`PinningApi`]).
//! - **Upload transport**: multipart upload of a file, a directory tree, or a
//!   pre-packaged CAR archive ([`ContentUploader`]).
//! - **Error normalization**: HTTP status codes, service envelope codes and free-text
//!   messages (in several languages) are collapsed into the closed [`RemoteError`]
//!   enum. A detected expired credential is reported to the user once through an
//!   [`ExpiryHint`] sink and surfaces as [`RemoteError::CredentialExpired`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pinlink_provider::{ClientConfig, Credential, PinningApi, PinningClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = Credential::new("0xabc", "token");
//!     let client = PinningClient::new(ClientConfig::default(), Some(credential))?;
//!
//!     if client.check_entitlement().await? {
//!         let free = client.check_domain_available("my-site").await?;
//!         println!("my-site available: {free}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## TLS Backend
//!
//! - **`rustls`** *(default)*: pure-Rust TLS, suited to static and cross-compiled builds.
//! - **`native-tls`**: the platform's native TLS implementation.

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::{
    ClientConfig, DEFAULT_API_BASE, ExpiryHint, LogExpiryHint, PinningClient, REMEDIATION_HINT,
};
pub use error::{RemoteError, Result};
pub use traits::{ContentUploader, PinningApi};
pub use types::{Credential, ExportStatus, ExportTask, UploadKind, UploadReceipt};

pub use utils::log_sanitizer;
