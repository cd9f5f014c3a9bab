use std::path::PathBuf;
use std::time::Duration;

/// Default export poll cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Settings for building preview and visit links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySettings {
    /// Gateway prefix for preview links, e.g. `https://pinme.eth.limo/#/preview`
    pub preview_base: String,
    /// Service-owned suffix for subdomain binds
    pub subdomain_suffix: String,
    /// Key for hash obfuscation; `None` leaves hashes readable
    pub shared_secret: Option<String>,
    /// Device identifier mixed into the obfuscated hash and sent as export `uid`
    pub device_id: Option<String>,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            preview_base: "https://pinme.eth.limo/#/preview".to_string(),
            subdomain_suffix: "pinit.eth.limo".to_string(),
            shared_secret: None,
            device_id: None,
        }
    }
}

impl DeploySettings {
    /// `<preview_base>/<token>`
    #[must_use]
    pub fn preview_url(&self, token: &str) -> String {
        format!("{}/{token}", self.preview_base.trim_end_matches('/'))
    }
}

/// Settings for the export job runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub poll_interval: Duration,
    /// Stop after this many status checks; `None` polls until a terminal state
    pub max_polls: Option<u32>,
    /// Directory used when no output path is given
    pub default_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
            default_dir: None,
        }
    }
}
