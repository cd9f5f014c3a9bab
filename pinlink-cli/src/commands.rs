//! Command handlers
//!
//! Each handler builds a service context from the stored configuration and calls
//! into `pinlink-core`. Services report their own errors, so a failed command
//! only turns into `false` here.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use pinlink_core::services::{DeployService, ImportExportService};
use pinlink_core::types::{BindOutcome, DeployRequest};
use pinlink_core::{CoreError, ServiceContext};
use pinlink_provider::log_sanitizer::mask_secret;
use pinlink_provider::{Credential, PinningClient};

use crate::adapters::{ConsoleExpiryHint, ConsoleReporter, KeyringCredentialStore};
use crate::cli::Commands;
use crate::config::{AppConfig, default_download_dir};
use crate::prompt::prompt_deploy_request;

/// Loaded configuration plus the credential store
pub struct App {
    config: AppConfig,
    store: KeyringCredentialStore,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig, store: KeyringCredentialStore) -> Self {
        Self { config, store }
    }

    pub async fn run(&self, command: Commands) -> Result<bool> {
        match command {
            Commands::Upload { path, domain, dns } => {
                let request = match path {
                    Some(path) => {
                        let request = DeployRequest::new(path);
                        match domain {
                            Some(domain) => request.with_domain(domain, dns),
                            None => request,
                        }
                    }
                    None => prompt_interactively().await?,
                };
                self.upload(&request).await
            }
            Commands::Import { file } => self.import(&file).await,
            Commands::Export { cid, output } => self.export(&cid, output.as_deref()).await,
            Commands::Login { address, token } => self.login(address, token).await,
            Commands::Logout => self.logout().await,
        }
    }

    async fn upload(&self, request: &DeployRequest) -> Result<bool> {
        let ctx = self.context().await?;
        let outcome = match DeployService::new(ctx).deploy(request).await {
            Ok(outcome) => outcome,
            Err(e) => return Ok(failed(&e)),
        };

        tracing::debug!("Deploy outcome: {outcome:?}");
        Ok(!matches!(outcome.bind, Some(BindOutcome::Failed(_))))
    }

    async fn import(&self, file: &Path) -> Result<bool> {
        let ctx = self.context().await?;
        match ImportExportService::new(ctx).import_archive(file).await {
            Ok(outcome) => {
                tracing::debug!("Imported archive as {}", outcome.content_hash);
                Ok(true)
            }
            Err(e) => Ok(failed(&e)),
        }
    }

    async fn export(&self, cid: &str, output: Option<&Path>) -> Result<bool> {
        let uid = self.store.device_id().await?;
        let ctx = self.context().await?;
        match ImportExportService::new(ctx)
            .export_to_archive(cid, &uid, output)
            .await
        {
            Ok(path) => {
                tracing::debug!("Export written to {}", path.display());
                Ok(true)
            }
            Err(e) => Ok(failed(&e)),
        }
    }

    async fn login(&self, address: String, token: String) -> Result<bool> {
        let credential = Credential::new(address.trim(), token.trim());
        if !credential.is_complete() {
            anyhow::bail!("Address and token must not be empty");
        }
        self.store.save(&credential).await?;
        println!(
            "Logged in as {} (token {})",
            credential.address,
            mask_secret(&credential.token)
        );
        Ok(true)
    }

    async fn logout(&self) -> Result<bool> {
        if self.store.clear().await? {
            println!("Logged out");
        } else {
            println!("Not logged in");
        }
        Ok(true)
    }

    /// Wire the pinning client, console reporter and settings into a service context.
    async fn context(&self) -> Result<Arc<ServiceContext>> {
        let credential = self.store.load().await?;
        let device_id = match self.store.device_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("No device id available: {e:#}");
                None
            }
        };

        let client = PinningClient::new(
            self.config.client_config(device_id.clone()),
            credential.clone(),
        )
        .context("Failed to create HTTP client")?
        .with_expiry_hint(Arc::new(ConsoleExpiryHint));
        let client = Arc::new(client);

        let ctx = ServiceContext::new(
            client.clone(),
            client,
            Arc::new(ConsoleReporter),
            credential,
        )
        .with_deploy_settings(self.config.deploy_settings(device_id))
        .with_export_settings(self.config.export_settings(default_download_dir()));

        Ok(Arc::new(ctx))
    }
}

async fn prompt_interactively() -> Result<DeployRequest> {
    tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stderr();
        prompt_deploy_request(&mut input, &mut output)
    })
    .await
    .context("Prompt task failed")?
}

fn failed(err: &CoreError) -> bool {
    tracing::debug!("Command failed: {err:?}");
    false
}
