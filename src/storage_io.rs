//! Asynchronous whole-file read/write of framed fragment blobs.
//!
//! No partial-write recovery is attempted; a blob is atomic from the
//! pipeline's perspective, trusting the file system's own write semantics.

use std::path::Path;

use tokio::fs;
use tracing::trace;

use crate::error::FragmentError;

/// Writes `bytes` to `path`, creating parent directories as needed and
/// overwriting any existing blob at that path.
pub async fn write(path: &Path, bytes: &[u8]) -> Result<(), FragmentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| FragmentError::IoFailure(e.to_string()))?;
    }

    fs::write(path, bytes).await.map_err(|e| FragmentError::IoFailure(e.to_string()))?;
    trace!(path = %path.display(), len = bytes.len(), "wrote blob");
    Ok(())
}

/// Reads the whole blob at `path`. `NotFound` is distinguished from other
/// I/O failures so the `Consumer` can fall back to the next replica either
/// way, but report the more specific kind.
pub async fn read(path: &Path) -> Result<Vec<u8>, FragmentError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FragmentError::NotFound),
        Err(e) => Err(FragmentError::IoFailure(e.to_string())),
    }
}

pub async fn exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}
