use std::path::PathBuf;

use serde::Serialize;

use super::BindResult;
use crate::error::CoreError;

/// Input of one deploy, whether it came from arguments or prompts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployRequest {
    pub path: PathBuf,
    pub domain: Option<String>,
    pub force_dns: bool,
}

impl DeployRequest {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>, force_dns: bool) -> Self {
        let domain = domain.into();
        self.domain = (!domain.trim().is_empty()).then_some(domain);
        self.force_dns = force_dns;
        self
    }
}

/// What happened to the bind step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "camelCase")]
pub enum BindOutcome {
    Bound(BindResult),
    Failed(CoreError),
}

/// Result of a deploy; the upload part survives a failed bind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutcome {
    pub content_hash: String,
    pub preview_url: String,
    pub bind: Option<BindOutcome>,
}

impl DeployOutcome {
    /// Visit URL when the bind went through
    #[must_use]
    pub fn visit_url(&self) -> Option<&str> {
        match &self.bind {
            Some(BindOutcome::Bound(result)) => Some(&result.visit_url),
            _ => None,
        }
    }
}

/// Result of importing a CAR archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub content_hash: String,
    pub preview_url: String,
}
