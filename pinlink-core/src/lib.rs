//! pinlink Core Library
//!
//! Deployment orchestration for the pinning service:
//! - Domain classification and DNS syntax validation
//! - VIP entitlement gate
//! - Upload → obfuscated preview link → domain bind pipeline (Deploy Service)
//! - CAR archive export jobs and archive import (Import/Export Service)
//!
//! Remote calls go through the [`PinningApi`] and [`ContentUploader`] traits from
//! `pinlink-provider`; user-facing output goes through the [`Reporter`] trait, so the
//! front end decides how messages are rendered.

pub mod crypto;
pub mod domain;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{ContentUploader, PinningApi, Reporter};
