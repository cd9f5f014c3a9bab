//! Upload and domain bind orchestration

use std::path::Path;
use std::sync::Arc;

use crate::domain::{classify, validate_dns};
use crate::error::{CoreError, CoreResult};
use crate::services::{EntitlementService, ServiceContext};
use crate::types::{
    BindOutcome, BindResult, DeployOutcome, DeployRequest, DomainDescriptor, UploadKind,
};
use crate::utils::paths::resolve_target_path;

/// Deploy service
///
/// Runs one deploy: checks that need no upload come first and abort early;
/// once the upload succeeds its preview link is reported and kept, whatever
/// happens to the bind.
pub struct DeployService {
    ctx: Arc<ServiceContext>,
    entitlement: EntitlementService,
}

impl DeployService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            entitlement: EntitlementService::new(ctx.clone()),
            ctx,
        }
    }

    /// Deploy a file or directory, optionally binding a domain to it.
    pub async fn deploy(&self, request: &DeployRequest) -> CoreResult<DeployOutcome> {
        let path = resolve_target_path(&request.path)
            .await
            .map_err(|e| self.ctx.abort(e))?;

        let domain = request
            .domain
            .as_deref()
            .map(|raw| classify(raw, request.force_dns));

        if let Some(domain) = &domain {
            self.preflight(domain).await.map_err(|e| self.ctx.abort(e))?;
        }

        let content_hash = self.upload(&path).await.map_err(|e| self.ctx.abort(e))?;

        let preview_url = self.ctx.preview_url(&content_hash);
        self.ctx
            .reporter
            .success(&format!("Preview: {preview_url}"));

        let bind = match &domain {
            Some(domain) => Some(self.bind(domain, &content_hash).await),
            None => None,
        };

        Ok(DeployOutcome {
            content_hash,
            preview_url,
            bind,
        })
    }

    /// Validation, credential, entitlement and availability, in that order.
    async fn preflight(&self, domain: &DomainDescriptor) -> CoreResult<()> {
        if domain.is_dns {
            validate_dns(&domain.display_name)?;
        }

        self.ctx.require_credential()?;

        self.ctx.reporter.step("Checking membership");
        self.entitlement.ensure().await?;

        self.ctx
            .reporter
            .step(&format!("Checking availability of {}", domain.display_name));
        let available = self
            .ctx
            .api
            .check_domain_available(&domain.display_name)
            .await?;
        if !available {
            return Err(CoreError::DomainUnavailable(domain.display_name.clone()));
        }
        Ok(())
    }

    async fn upload(&self, path: &Path) -> CoreResult<String> {
        self.ctx
            .reporter
            .step(&format!("Uploading {}", path.display()));
        let receipt = self
            .ctx
            .uploader
            .upload(path, UploadKind::Content)
            .await
            .map_err(|e| ServiceContext::step_error(e, CoreError::UploadFailed))?;
        log::info!("Uploaded {} as {}", path.display(), receipt.content_hash);
        Ok(receipt.content_hash)
    }

    /// Bind by the descriptor's classification; failures are captured, never raised.
    async fn bind(&self, domain: &DomainDescriptor, content_hash: &str) -> BindOutcome {
        self.ctx
            .reporter
            .step(&format!("Binding {}", domain.display_name));

        let result = if domain.is_dns {
            self.ctx
                .api
                .bind_dns_domain(&domain.display_name, content_hash)
                .await
        } else {
            self.ctx
                .api
                .bind_subdomain(&domain.display_name, content_hash)
                .await
        };

        match result {
            Ok(()) => {
                let bound = BindResult::for_domain(domain, &self.ctx.deploy.subdomain_suffix);
                self.ctx
                    .reporter
                    .success(&format!("Visit: {}", bound.visit_url));
                BindOutcome::Bound(bound)
            }
            Err(e) => {
                let err = self
                    .ctx
                    .abort(ServiceContext::step_error(e, CoreError::BindFailed));
                BindOutcome::Failed(err)
            }
        }
    }
}
