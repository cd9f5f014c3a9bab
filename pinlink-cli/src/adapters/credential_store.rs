//! Keyring-based credential store
//!
//! The session token lives in the system keychain (macOS Keychain, Windows Credential
//! Manager, Linux Secret Service) via the `keyring` crate, under the wallet address.
//! The config directory only holds non-secret metadata: `auth.json` with the address
//! and save time, and `device_id` with a random identifier created on first use.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use pinlink_provider::Credential;
use serde::{Deserialize, Serialize};

const SERVICE_NAME: &str = "pinlink";
const AUTH_FILE_NAME: &str = "auth.json";
const DEVICE_ID_FILE_NAME: &str = "device_id";

/// Secret storage keyed by account name.
pub trait SecretVault: Send + Sync {
    fn get(&self, account: &str) -> Result<Option<String>>;
    fn set(&self, account: &str, secret: &str) -> Result<()>;
    /// `false` when nothing was stored for `account`.
    fn delete(&self, account: &str) -> Result<bool>;
}

/// System keychain vault.
pub struct KeyringVault;

impl KeyringVault {
    fn entry(account: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, account).context("Failed to open keychain entry")
    }
}

impl SecretVault for KeyringVault {
    fn get(&self, account: &str) -> Result<Option<String>> {
        match Self::entry(account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    fn set(&self, account: &str, secret: &str) -> Result<()> {
        Self::entry(account)?
            .set_password(secret)
            .context("Failed to store token in keychain")
    }

    fn delete(&self, account: &str) -> Result<bool> {
        match Self::entry(account)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e).context("Failed to remove token from keychain"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLogin {
    address: String,
    saved_at: DateTime<Utc>,
}

/// Credential store: token in the keychain, metadata in the pinlink config directory.
pub struct KeyringCredentialStore {
    dir: PathBuf,
    vault: Arc<dyn SecretVault>,
}

impl KeyringCredentialStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_vault(dir, Arc::new(KeyringVault))
    }

    #[must_use]
    pub fn with_vault(dir: impl Into<PathBuf>, vault: Arc<dyn SecretVault>) -> Self {
        Self {
            dir: dir.into(),
            vault,
        }
    }

    fn auth_path(&self) -> PathBuf {
        self.dir.join(AUTH_FILE_NAME)
    }

    fn device_id_path(&self) -> PathBuf {
        self.dir.join(DEVICE_ID_FILE_NAME)
    }

    async fn read_login(&self) -> Result<Option<StoredLogin>> {
        let path = self.auth_path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };

        match serde_json::from_str::<StoredLogin>(&content) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    /// Run a blocking vault call off the async runtime.
    async fn with_vault_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SecretVault) -> Result<T> + Send + 'static,
    {
        let vault = self.vault.clone();
        tokio::task::spawn_blocking(move || op(vault.as_ref()))
            .await
            .context("Keychain task failed")?
    }

    /// Stored credential, if any. Missing metadata or a missing token means logged out.
    pub async fn load(&self) -> Result<Option<Credential>> {
        let Some(stored) = self.read_login().await? else {
            return Ok(None);
        };

        let address = stored.address.clone();
        let Some(token) = self
            .with_vault_blocking(move |vault| vault.get(&address))
            .await?
        else {
            tracing::warn!("No keychain token for {}, treating as logged out", stored.address);
            return Ok(None);
        };

        tracing::debug!("Loaded credential saved at {}", stored.saved_at);
        let credential = Credential::new(stored.address, token);
        Ok(credential.is_complete().then_some(credential))
    }

    pub async fn save(&self, credential: &Credential) -> Result<()> {
        // A previous login under another address leaves no token behind
        if let Some(previous) = self.read_login().await?
            && previous.address != credential.address
        {
            self.with_vault_blocking(move |vault| vault.delete(&previous.address))
                .await?;
        }

        let address = credential.address.clone();
        let token = credential.token.clone();
        self.with_vault_blocking(move |vault| vault.set(&address, &token))
            .await?;

        let stored = StoredLogin {
            address: credential.address.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        write_private(&self.auth_path(), json.as_bytes()).await?;
        tracing::info!("Saved credential for {} to keychain", credential.address);
        Ok(())
    }

    /// Remove the stored credential; `false` when there was none.
    pub async fn clear(&self) -> Result<bool> {
        let removed_token = match self.read_login().await? {
            Some(stored) => {
                self.with_vault_blocking(move |vault| vault.delete(&stored.address))
                    .await?
            }
            None => false,
        };

        let path = self.auth_path();
        let removed_file = match tokio::fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to remove {}", path.display()));
            }
        };
        Ok(removed_token || removed_file)
    }

    /// Device identifier, generated and persisted on first call.
    pub async fn device_id(&self) -> Result<String> {
        let path = self.device_id_path();
        if let Ok(existing) = tokio::fs::read_to_string(&path).await {
            let existing = existing.trim();
            if !existing.is_empty() {
                return Ok(existing.to_string());
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        write_private(&path, id.as_bytes()).await?;
        tracing::debug!("Generated device id {id}");
        Ok(id)
    }
}

async fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .with_context(|| format!("Failed to restrict {}", path.display()))?;
    }
    Ok(())
}

/// In-memory vault for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryVault {
    secrets: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryVault {
    pub fn contains(&self, account: &str) -> bool {
        self.secrets.lock().unwrap().contains_key(account)
    }
}

#[cfg(test)]
impl SecretVault for MemoryVault {
    fn get(&self, account: &str) -> Result<Option<String>> {
        Ok(self.secrets.lock().unwrap().get(account).cloned())
    }

    fn set(&self, account: &str, secret: &str) -> Result<()> {
        self.secrets
            .lock()
            .unwrap()
            .insert(account.to_string(), secret.to_string());
        Ok(())
    }

    fn delete(&self, account: &str) -> Result<bool> {
        Ok(self.secrets.lock().unwrap().remove(account).is_some())
    }
}
