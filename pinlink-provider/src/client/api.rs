//! `PinningApi` trait implementation

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{RemoteError, Result};
use crate::http_client::transport_error;
use crate::traits::PinningApi;
use crate::types::ExportTask;
use crate::utils::log_sanitizer::truncate_for_log;

use super::PinningClient;
use super::types::{
    BindRequest, ExportRequest, ExportTaskData, VipData, availability_flag,
};

const BIND_SUBDOMAIN_PATH: &str = "/bind_pinme_domain";
const BIND_DNS_PATH: &str = "/bind_dns_domain";
const VIP_PATH: &str = "/user/vip";
const EXPORT_PATH: &str = "/car/export";
const EXPORT_STATUS_PATH: &str = "/car/export/status";

fn local_io(e: &std::io::Error, dest: &Path) -> RemoteError {
    RemoteError::LocalIo {
        detail: format!("{}: {e}", dest.display()),
    }
}

/// Sibling path the archive is streamed into before the final rename.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_to_file(response: &mut reqwest::Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| local_io(&e, path))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| local_io(&e, path))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| local_io(&e, path))?;
    Ok(written)
}

#[async_trait]
impl PinningApi for PinningClient {
    async fn check_domain_available(&self, name: &str) -> Result<bool> {
        let query = format!("?domain_name={}", urlencoding::encode(name));
        let mut paths = vec![self.config.availability_path.as_str()];
        if self.config.availability_fallback_path != self.config.availability_path {
            paths.push(self.config.availability_fallback_path.as_str());
        }

        for path in paths {
            match self.get_raw(&format!("{path}{query}")).await {
                Ok(body) => {
                    if let Some(available) = availability_flag(&body) {
                        log::debug!("Availability of '{name}' via {path}: {available}");
                        return Ok(available);
                    }
                    log::debug!("Availability probe {path} returned no is_valid flag");
                }
                Err(e) if e.is_credential_expired() => return Err(e),
                Err(e) => log::debug!("Availability probe {path} failed: {e}"),
            }
        }

        log::warn!("Could not determine availability of '{name}', assuming available");
        Ok(true)
    }

    async fn bind_subdomain(&self, name: &str, content_hash: &str) -> Result<()> {
        let body = BindRequest {
            domain_name: name,
            hash: content_hash,
        };
        self.post::<serde_json::Value, _>(BIND_SUBDOMAIN_PATH, &body)
            .await?;
        log::info!("Bound subdomain '{name}' to {content_hash}");
        Ok(())
    }

    async fn bind_dns_domain(&self, domain: &str, content_hash: &str) -> Result<()> {
        let body = BindRequest {
            domain_name: domain,
            hash: content_hash,
        };
        self.post::<serde_json::Value, _>(BIND_DNS_PATH, &body).await?;
        log::info!("Bound DNS domain '{domain}' to {content_hash}");
        Ok(())
    }

    async fn check_entitlement(&self) -> Result<bool> {
        let data: Option<VipData> = self.get(VIP_PATH).await?;
        Ok(data.is_some_and(|d| d.is_vip))
    }

    async fn request_export(&self, cid: &str, uid: &str) -> Result<ExportTask> {
        let body = ExportRequest { cid, uid };
        let data: ExportTaskData = self
            .post(EXPORT_PATH, &body)
            .await?
            .ok_or_else(|| Self::parse_error("export response is missing data"))?;
        if data.task_id.is_empty() {
            return Err(Self::parse_error("export response is missing task_id"));
        }
        let task = data.into_task("", cid);
        log::info!("Export task {} created for {cid}", task.task_id);
        Ok(task)
    }

    async fn poll_export_status(&self, task_id: &str) -> Result<ExportTask> {
        let path = format!(
            "{EXPORT_STATUS_PATH}?task_id={}",
            urlencoding::encode(task_id)
        );
        let data: ExportTaskData = self
            .get(&path)
            .await?
            .ok_or_else(|| Self::parse_error("export status response is missing data"))?;
        Ok(data.into_task(task_id, ""))
    }

    async fn download_archive(&self, url: &str, dest: &Path) -> Result<u64> {
        log::debug!("GET {url} -> {}", dest.display());
        // Download links may point at a storage host; credentials stay with the service.
        let from_service = self.is_service_url(url);
        let request = if from_service {
            self.authorize(self.transfer_client.get(url))
        } else {
            self.transfer_client.get(url)
        };
        let mut response = request.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let text = response.text().await.unwrap_or_default();
            if from_service {
                return Err(self.status_error(status, &text));
            }
            log::error!("Archive download failed with HTTP {status}");
            return Err(RemoteError::Api {
                status: Some(status),
                raw_code: None,
                raw_message: if text.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    truncate_for_log(&text)
                },
            });
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| local_io(&e, parent))?;
        }

        let partial = partial_path(dest);
        let written = match stream_to_file(&mut response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    log::debug!("Could not remove {}: {cleanup}", partial.display());
                }
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| local_io(&e, dest))?;

        log::info!("Downloaded {written} bytes to {}", dest.display());
        Ok(written)
    }
}
