//! Test helpers
//!
//! Mock implementations of the remote traits plus a harness wiring them into a `ServiceContext`.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pinlink_provider::{RemoteError, Result};

use crate::services::ServiceContext;
use crate::traits::{ContentUploader, PinningApi, Reporter};
use crate::types::{
    Credential, DeploySettings, ExportSettings, ExportStatus, ExportTask, UploadKind,
    UploadReceipt,
};

// ===== MockPinningApi =====

/// Remote call as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Available(String),
    BindSubdomain(String, String),
    BindDns(String, String),
    Entitlement,
    RequestExport(String, String),
    PollExport(String),
    Download(String, String),
}

pub struct MockPinningApi {
    calls: Mutex<Vec<ApiCall>>,
    available: Mutex<Result<bool>>,
    bind: Mutex<Result<()>>,
    entitlement: Mutex<Result<bool>>,
    export_script: Mutex<VecDeque<ExportStatus>>,
    poll_error: Mutex<Option<RemoteError>>,
    download_url: Mutex<Option<String>>,
}

impl MockPinningApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            available: Mutex::new(Ok(true)),
            bind: Mutex::new(Ok(())),
            entitlement: Mutex::new(Ok(true)),
            export_script: Mutex::new(VecDeque::new()),
            poll_error: Mutex::new(None),
            download_url: Mutex::new(Some("https://cdn.test/archive.car".to_string())),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_available(&self, result: Result<bool>) {
        *self.available.lock().unwrap() = result;
    }

    pub fn set_bind(&self, result: Result<()>) {
        *self.bind.lock().unwrap() = result;
    }

    pub fn set_entitlement(&self, result: Result<bool>) {
        *self.entitlement.lock().unwrap() = result;
    }

    /// Statuses returned by successive status checks; the last one repeats.
    pub fn script_export(&self, statuses: &[ExportStatus]) {
        *self.export_script.lock().unwrap() = statuses.iter().copied().collect();
    }

    pub fn set_poll_error(&self, err: RemoteError) {
        *self.poll_error.lock().unwrap() = Some(err);
    }

    pub fn set_download_url(&self, url: Option<&str>) {
        *self.download_url.lock().unwrap() = url.map(ToString::to_string);
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_status(&self) -> ExportStatus {
        let mut script = self.export_script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap_or(ExportStatus::Processing)
        } else {
            script.front().copied().unwrap_or(ExportStatus::Processing)
        }
    }
}

#[async_trait]
impl PinningApi for MockPinningApi {
    async fn check_domain_available(&self, name: &str) -> Result<bool> {
        self.record(ApiCall::Available(name.to_string()));
        self.available.lock().unwrap().clone()
    }

    async fn bind_subdomain(&self, name: &str, content_hash: &str) -> Result<()> {
        self.record(ApiCall::BindSubdomain(
            name.to_string(),
            content_hash.to_string(),
        ));
        self.bind.lock().unwrap().clone()
    }

    async fn bind_dns_domain(&self, domain: &str, content_hash: &str) -> Result<()> {
        self.record(ApiCall::BindDns(domain.to_string(), content_hash.to_string()));
        self.bind.lock().unwrap().clone()
    }

    async fn check_entitlement(&self) -> Result<bool> {
        self.record(ApiCall::Entitlement);
        self.entitlement.lock().unwrap().clone()
    }

    async fn request_export(&self, cid: &str, uid: &str) -> Result<ExportTask> {
        self.record(ApiCall::RequestExport(cid.to_string(), uid.to_string()));
        Ok(ExportTask {
            task_id: "task-1".to_string(),
            cid: cid.to_string(),
            status: ExportStatus::Processing,
            download_url: None,
            error_message: None,
        })
    }

    async fn poll_export_status(&self, task_id: &str) -> Result<ExportTask> {
        self.record(ApiCall::PollExport(task_id.to_string()));
        if let Some(err) = self.poll_error.lock().unwrap().clone() {
            return Err(err);
        }
        let status = self.next_status();
        Ok(ExportTask {
            task_id: String::new(),
            cid: String::new(),
            status,
            download_url: (status == ExportStatus::Completed)
                .then(|| self.download_url.lock().unwrap().clone())
                .flatten(),
            error_message: (status == ExportStatus::Failed).then(|| "pin not found".to_string()),
        })
    }

    async fn download_archive(&self, url: &str, dest: &Path) -> Result<u64> {
        self.record(ApiCall::Download(
            url.to_string(),
            dest.display().to_string(),
        ));
        Ok(7)
    }
}

// ===== MockUploader =====

pub struct MockUploader {
    uploads: Mutex<Vec<UploadKind>>,
    error: Mutex<Option<RemoteError>>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn last_kind(&self) -> Option<UploadKind> {
        self.uploads.lock().unwrap().last().copied()
    }

    pub fn fail_with(&self, err: RemoteError) {
        *self.error.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl ContentUploader for MockUploader {
    async fn upload(&self, _path: &Path, kind: UploadKind) -> Result<UploadReceipt> {
        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }
        self.uploads.lock().unwrap().push(kind);
        Ok(UploadReceipt {
            content_hash: "bafyhash".to_string(),
        })
    }
}

// ===== RecordingReporter =====

#[derive(Default)]
pub struct RecordingReporter {
    steps: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn steps(&self) -> Vec<String> {
        self.steps.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn failure(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}

// ===== Factory =====

/// Service context wired to mocks, with handles kept for assertions
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub api: Arc<MockPinningApi>,
    pub uploader: Arc<MockUploader>,
    pub reporter: Arc<RecordingReporter>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_api(MockPinningApi::new())
    }

    pub fn with_api(api: MockPinningApi) -> Self {
        Self::build(api, Some(test_credential()), DeploySettings::default())
    }

    pub fn without_credential() -> Self {
        Self::build(MockPinningApi::new(), None, DeploySettings::default())
    }

    pub fn with_secret(secret: &str) -> Self {
        let settings = DeploySettings {
            shared_secret: Some(secret.to_string()),
            device_id: Some("device-1".to_string()),
            ..DeploySettings::default()
        };
        Self::build(MockPinningApi::new(), Some(test_credential()), settings)
    }

    /// Rebuild the context with different export settings
    pub fn export_settings(self, export: ExportSettings) -> Self {
        let ctx = ServiceContext::new(
            self.api.clone(),
            self.uploader.clone(),
            self.reporter.clone(),
            self.ctx.credential.clone(),
        )
        .with_deploy_settings(self.ctx.deploy.clone())
        .with_export_settings(export);
        Self {
            ctx: Arc::new(ctx),
            ..self
        }
    }

    fn build(api: MockPinningApi, credential: Option<Credential>, deploy: DeploySettings) -> Self {
        let api = Arc::new(api);
        let uploader = Arc::new(MockUploader::new());
        let reporter = Arc::new(RecordingReporter::default());
        let ctx = ServiceContext::new(api.clone(), uploader.clone(), reporter.clone(), credential)
            .with_deploy_settings(deploy);
        Self {
            ctx: Arc::new(ctx),
            api,
            uploader,
            reporter,
        }
    }
}

pub fn test_credential() -> Credential {
    Credential::new("0xabc", "tok-123")
}
