//! Shared test helpers: a mock pinning service and a counting hint sink.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pinlink_provider::{ClientConfig, Credential, ExpiryHint, PinningClient, RemoteError};
use wiremock::MockServer;

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Hint sink that counts how often it fired.
#[derive(Default)]
pub struct CountingHint {
    pub shown: AtomicUsize,
}

impl CountingHint {
    pub fn count(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

impl ExpiryHint for CountingHint {
    fn show(&self, _error: &RemoteError) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test context: mock server plus a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub client: PinningClient,
    pub hint: Arc<CountingHint>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut ClientConfig)) -> Self {
        let server = MockServer::start().await;
        let mut config = ClientConfig {
            api_base: server.uri(),
            ..ClientConfig::default()
        };
        adjust(&mut config);

        let hint = Arc::new(CountingHint::default());
        let client = PinningClient::new(config, Some(Credential::new("0xabc", "tok-123")))
            .expect("client builds")
            .with_expiry_hint(hint.clone());

        Self {
            server,
            client,
            hint,
        }
    }
}
