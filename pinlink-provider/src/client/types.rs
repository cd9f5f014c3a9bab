//! Pinning service wire types

use serde::{Deserialize, Serialize};

use crate::types::{ExportStatus, ExportTask};

/// Standard response envelope: `{ code, msg, data }`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Envelope code as a string (the service mixes numbers and strings).
    pub fn code_string(&self) -> Option<String> {
        self.code.as_ref().and_then(code_to_string)
    }

    /// Missing code counts as success; otherwise `0` or `200`.
    pub fn is_success(&self) -> bool {
        self.code_string()
            .is_none_or(|code| code == "0" || code == "200")
    }
}

pub fn code_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Best-effort message extraction from an arbitrary error body.
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    ["msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}

/// Availability flag at top level or nested under `data`.
pub fn availability_flag(body: &serde_json::Value) -> Option<bool> {
    body.get("is_valid")
        .and_then(serde_json::Value::as_bool)
        .or_else(|| {
            body.get("data")
                .and_then(|data| data.get("is_valid"))
                .and_then(serde_json::Value::as_bool)
        })
}

#[derive(Debug, Serialize)]
pub struct BindRequest<'a> {
    pub domain_name: &'a str,
    pub hash: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct VipData {
    #[serde(default)]
    pub is_vip: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportRequest<'a> {
    pub cid: &'a str,
    pub uid: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ExportTaskData {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub cid: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default, alias = "error", alias = "message")]
    pub error_msg: Option<String>,
}

impl ExportTaskData {
    /// Fallbacks fill in identifiers the status endpoint omits.
    pub fn into_task(self, fallback_task_id: &str, fallback_cid: &str) -> ExportTask {
        ExportTask {
            status: ExportStatus::from_wire(&self.status),
            cid: or_fallback(self.cid, fallback_cid),
            task_id: or_fallback(self.task_id, fallback_task_id),
            download_url: self.download_url.filter(|u| !u.is_empty()),
            error_message: self.error_msg.filter(|m| !m.is_empty()),
        }
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadData {
    #[serde(alias = "cid", alias = "root_cid")]
    pub hash: String,
}
