//! CAR archive export and import

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{ExportStatus, ExportTask, ImportOutcome, UploadKind};
use crate::utils::paths::{resolve_output_path, resolve_target_path};

/// Import/export service
pub struct ImportExportService {
    ctx: Arc<ServiceContext>,
}

impl ImportExportService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Export `cid` as a CAR archive and save it locally.
    ///
    /// Submits the export, polls at the configured interval until the task
    /// completes or fails, then downloads the archive.
    ///
    /// # Returns
    /// Path of the written archive
    pub async fn export_to_archive(
        &self,
        cid: &str,
        uid: &str,
        output: Option<&Path>,
    ) -> CoreResult<PathBuf> {
        self.run_export(cid, uid, output)
            .await
            .map_err(|e| self.ctx.abort(e))
    }

    async fn run_export(&self, cid: &str, uid: &str, output: Option<&Path>) -> CoreResult<PathBuf> {
        self.ctx.require_credential()?;

        self.ctx
            .reporter
            .step(&format!("Requesting export of {cid}"));
        let task = self.ctx.api.request_export(cid, uid).await?;
        log::info!("Export task {} created ({})", task.task_id, task.status);

        let task = self.wait_for_terminal(task).await?;
        if task.status != ExportStatus::Completed {
            return Err(CoreError::ExportFailed(
                task.error_message
                    .unwrap_or_else(|| "export task failed".to_string()),
            ));
        }

        let Some(url) = task.download_url.filter(|u| !u.is_empty()) else {
            return Err(CoreError::ExportFailed(
                "task completed without a download URL".to_string(),
            ));
        };

        let dest = resolve_output_path(output, self.ctx.export.default_dir.as_deref(), cid).await;
        self.ctx
            .reporter
            .step(&format!("Downloading archive to {}", dest.display()));
        let bytes = self.ctx.api.download_archive(&url, &dest).await?;
        log::info!("Saved {bytes} bytes to {}", dest.display());

        self.ctx
            .reporter
            .success(&format!("Archive saved: {}", dest.display()));
        Ok(dest)
    }

    /// Poll until the task reaches `Completed` or `Failed`.
    async fn wait_for_terminal(&self, mut task: ExportTask) -> CoreResult<ExportTask> {
        let settings = &self.ctx.export;
        let mut polls: u32 = 0;

        while !task.status.is_terminal() {
            if let Some(max) = settings.max_polls
                && polls >= max
            {
                return Err(CoreError::ExportFailed(format!(
                    "timed out after {polls} status checks"
                )));
            }

            tokio::time::sleep(settings.poll_interval).await;
            let task_id = task.task_id.clone();
            let cid = task.cid.clone();
            task = self.ctx.api.poll_export_status(&task_id).await?;
            if task.task_id.is_empty() {
                task.task_id = task_id;
            }
            if task.cid.is_empty() {
                task.cid = cid;
            }
            polls += 1;
            log::debug!("Export task {} status: {} (check {polls})", task.task_id, task.status);
        }

        Ok(task)
    }

    /// Upload a local CAR file; the service unpacks it and returns the root CID.
    pub async fn import_archive(&self, path: &Path) -> CoreResult<ImportOutcome> {
        self.run_import(path).await.map_err(|e| self.ctx.abort(e))
    }

    async fn run_import(&self, path: &Path) -> CoreResult<ImportOutcome> {
        let path = resolve_target_path(path).await?;

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .map_err(|e| CoreError::Io(format!("{}: {e}", path.display())))?;
        let is_car = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("car"));
        if !is_file || !is_car {
            return Err(CoreError::ValidationError(format!(
                "{} is not a .car archive",
                path.display()
            )));
        }

        self.ctx
            .reporter
            .step(&format!("Importing {}", path.display()));
        let receipt = self
            .ctx
            .uploader
            .upload(&path, UploadKind::Archive)
            .await
            .map_err(|e| ServiceContext::step_error(e, CoreError::UploadFailed))?;

        let preview_url = self.ctx.preview_url(&receipt.content_hash);
        self.ctx
            .reporter
            .success(&format!("Preview: {preview_url}"));

        Ok(ImportOutcome {
            content_hash: receipt.content_hash,
            preview_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ApiCall, MockPinningApi, TestHarness};
    use crate::types::ExportSettings;
    use pinlink_provider::RemoteError;

    fn export_harness(statuses: &[ExportStatus], max_polls: Option<u32>) -> TestHarness {
        let api = MockPinningApi::new();
        api.script_export(statuses);
        TestHarness::with_api(api).export_settings(ExportSettings {
            max_polls,
            ..ExportSettings::default()
        })
    }

    fn status_checks(harness: &TestHarness) -> usize {
        harness
            .api
            .calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::PollExport(_)))
            .count()
    }

    fn downloads(harness: &TestHarness) -> usize {
        harness
            .api
            .calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Download(..)))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_polls_then_download() {
        let harness = export_harness(
            &[
                ExportStatus::Processing,
                ExportStatus::Processing,
                ExportStatus::Completed,
            ],
            None,
        );
        let dir = tempfile::tempdir().unwrap();

        let path = ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "device-1", Some(dir.path()))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("bafycid.car"));
        assert_eq!(status_checks(&harness), 3);
        assert_eq!(downloads(&harness), 1);
        assert_eq!(
            harness.api.calls()[0],
            ApiCall::RequestExport("bafycid".into(), "device-1".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_task_polls_once_without_download() {
        let harness = export_harness(&[ExportStatus::Failed], None);

        let err = ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "device-1", None)
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::ExportFailed("pin not found".into()));
        assert_eq!(status_checks(&harness), 1);
        assert_eq!(downloads(&harness), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_waits_interval_between_checks() {
        let harness = export_harness(&[ExportStatus::Processing, ExportStatus::Completed], None);
        let dir = tempfile::tempdir().unwrap();
        let started = tokio::time::Instant::now();

        ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "u", Some(&dir.path().join("out.car")))
            .await
            .unwrap();

        assert!(started.elapsed() >= ExportSettings::default().poll_interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_ceiling_times_out() {
        let harness = export_harness(&[ExportStatus::Processing; 10], Some(2));

        let err = ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "u", None)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExportFailed(ref m) if m.contains("timed out")));
        assert_eq!(status_checks(&harness), 2);
        assert_eq!(downloads(&harness), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_without_url_fails() {
        let harness = export_harness(&[ExportStatus::Completed], None);
        harness.api.set_download_url(None);

        let err = ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "u", None)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExportFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_requires_credential() {
        let harness = TestHarness::without_credential();

        let err = ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "u", None)
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::MissingCredential);
        assert!(harness.api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_while_polling_propagates_silently() {
        let harness = export_harness(&[ExportStatus::Processing], None);
        harness
            .api
            .set_poll_error(RemoteError::CredentialExpired { raw_message: None });

        let err = ImportExportService::new(harness.ctx.clone())
            .export_to_archive("bafycid", "u", None)
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::CredentialExpired);
        assert!(harness.reporter.failures().is_empty());
    }

    #[tokio::test]
    async fn test_import_rejects_non_car() {
        let harness = TestHarness::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("site.zip");
        std::fs::write(&file, b"zip").unwrap();

        let service = ImportExportService::new(harness.ctx.clone());
        assert!(matches!(
            service.import_archive(&file).await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            service.import_archive(dir.path()).await,
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(harness.uploader.uploads(), 0);
    }

    #[tokio::test]
    async fn test_import_uploads_archive_and_reports_preview() {
        let harness = TestHarness::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("site.CAR");
        std::fs::write(&file, b"car").unwrap();

        let outcome = ImportExportService::new(harness.ctx.clone())
            .import_archive(&file)
            .await
            .unwrap();

        assert_eq!(outcome.content_hash, "bafyhash");
        assert_eq!(harness.uploader.last_kind(), Some(UploadKind::Archive));
        assert_eq!(
            harness.reporter.successes(),
            vec![format!("Preview: {}", outcome.preview_url)]
        );
    }
}
