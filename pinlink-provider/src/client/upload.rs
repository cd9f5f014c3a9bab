//! Multipart upload transport

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::{RemoteError, Result};
use crate::http_client::HttpUtils;
use crate::traits::ContentUploader;
use crate::types::{UploadKind, UploadReceipt};

use super::PinningClient;
use super::types::UploadData;

const UPLOAD_PATH: &str = "/upload";
const UPLOAD_CAR_PATH: &str = "/upload_car";

fn read_error(path: &Path, e: &std::io::Error) -> RemoteError {
    RemoteError::LocalIo {
        detail: format!("{}: {e}", path.display()),
    }
}

/// Every regular file under `root`, paired with its `/`-separated path relative to the
/// parent of `root` (so the uploaded tree keeps its top-level directory name).
async fn collect_files(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let base = root.parent().unwrap_or(root).to_path_buf();
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(path) = pending.pop() {
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| read_error(&path, &e))?;
        if metadata.is_dir() {
            let mut entries = tokio::fs::read_dir(&path)
                .await
                .map_err(|e| read_error(&path, &e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| read_error(&path, &e))?
            {
                let entry_path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| read_error(&entry_path, &e))?;
                if file_type.is_symlink() && !links_to_file(&entry_path).await {
                    log::debug!("Skipping symlink {}", entry_path.display());
                    continue;
                }
                pending.push(entry_path);
            }
        } else if metadata.is_file() {
            let relative = path
                .strip_prefix(&base)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            files.push((path, relative));
        }
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

/// Symlinked files are followed; links to directories, dangling links and loops are not.
async fn links_to_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

#[async_trait]
impl ContentUploader for PinningClient {
    async fn upload(&self, path: &Path, kind: UploadKind) -> Result<UploadReceipt> {
        let files = collect_files(path).await?;
        if files.is_empty() {
            return Err(RemoteError::LocalIo {
                detail: format!("{}: nothing to upload", path.display()),
            });
        }
        log::info!("Uploading {} file(s) from {}", files.len(), path.display());

        let mut form = Form::new();
        for (file, relative) in files {
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|e| read_error(&file, &e))?;
            form = form.part("file", Part::bytes(bytes).file_name(relative));
        }

        let endpoint = match kind {
            UploadKind::Content => UPLOAD_PATH,
            UploadKind::Archive => UPLOAD_CAR_PATH,
        };
        let mut url = self.url(endpoint);
        if let Some(device_id) = &self.config.device_id {
            url = format!("{url}?uid={}", urlencoding::encode(device_id));
        }

        let request = self.authorize(self.transfer_client.post(&url).multipart(form));
        let (status, text) = HttpUtils::execute_request(request, "POST", &url).await?;
        let data: UploadData = self
            .unwrap_envelope(status, &text)?
            .ok_or_else(|| Self::parse_error("upload response is missing data"))?;

        log::info!("Upload complete: {}", data.hash);
        Ok(UploadReceipt {
            content_hash: data.hash,
        })
    }
}
