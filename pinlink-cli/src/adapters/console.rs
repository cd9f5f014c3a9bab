//! Plain line output on the terminal

use pinlink_core::Reporter;
use pinlink_provider::{ExpiryHint, REMEDIATION_HINT, RemoteError};

/// Progress on stderr, results on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn step(&self, message: &str) {
        eprintln!("  {message}...");
    }

    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn failure(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

/// Prints the re-login hint when the client detects an expired credential.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleExpiryHint;

impl ExpiryHint for ConsoleExpiryHint {
    fn show(&self, error: &RemoteError) {
        tracing::debug!("Credential rejected: {error}");
        eprintln!("{REMEDIATION_HINT}");
    }
}
