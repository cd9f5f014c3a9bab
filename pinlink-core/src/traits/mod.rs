//! Abstraction layer traits
//!
//! Remote operations come from the provider library; the front end supplies a [`Reporter`].

mod reporter;

pub use pinlink_provider::{ContentUploader, PinningApi};
pub use reporter::Reporter;
