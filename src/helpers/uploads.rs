use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::ApiError;

/// Reduce a client-supplied file name to a safe single path component.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; spaces become `_`; every
/// other character is dropped, as are leading dots and underscores. Returns
/// `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    // Browsers on Windows may send the full client path
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c),
            '.' | '-' | '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Write an uploaded resume to `<upload_dir>/<student_id>_<filename>`.
pub async fn save_resume(
    upload_dir: &Path,
    student_id: i32,
    original_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, ApiError> {
    let filename = sanitize_filename(original_name).unwrap_or_else(|| "resume".to_string());
    let path = upload_dir.join(format!("{}_{}", student_id, filename));

    debug!("Writing resume for student {} to {}", student_id, path.display());
    fs::create_dir_all(upload_dir).await?;
    fs::write(&path, bytes).await?;

    info!("Stored resume ({} bytes) at {}", bytes.len(), path.display());
    Ok(path)
}
