//! Front-end implementations of the core's collaborator traits

mod console;
mod credential_store;

pub use console::{ConsoleExpiryHint, ConsoleReporter};
pub use credential_store::KeyringCredentialStore;
#[cfg(test)]
pub use credential_store::MemoryVault;
