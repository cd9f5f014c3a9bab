//! Local path resolution for deploy, import and export

use std::io::ErrorKind;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Resolve a deploy/import target to an absolute path that exists.
pub async fn resolve_target_path(path: &Path) -> CoreResult<PathBuf> {
    match tokio::fs::canonicalize(path).await {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(CoreError::PathNotFound(path.display().to_string()))
        }
        Err(e) => Err(CoreError::Io(format!("{}: {e}", path.display()))),
    }
}

/// Archive file name for a CID
#[must_use]
pub fn archive_file_name(cid: &str) -> String {
    format!("{cid}.car")
}

/// Where an exported archive is written.
///
/// An explicit path wins; if it is an existing directory (or ends with a
/// separator) `<cid>.car` is appended. Without one, `<cid>.car` goes into
/// `default_dir`, or the current directory.
pub async fn resolve_output_path(
    explicit: Option<&Path>,
    default_dir: Option<&Path>,
    cid: &str,
) -> PathBuf {
    let file_name = archive_file_name(cid);

    if let Some(path) = explicit {
        let names_dir = path.as_os_str().to_string_lossy().ends_with(MAIN_SEPARATOR)
            || path.as_os_str().to_string_lossy().ends_with('/');
        let is_dir = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        return if names_dir || is_dir {
            path.join(file_name)
        } else {
            path.to_path_buf()
        };
    }

    default_dir
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        .join(file_name)
}
