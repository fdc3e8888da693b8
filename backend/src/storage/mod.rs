//! Cover image storage
//!
//! Uploaded files are renamed to `<uuid>.<ext>` (keeping the original
//! extension) and written flat into the configured upload directory,
//! which the router serves under `/uploads`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// URL prefix stored uploads are served under
pub const PUBLIC_PREFIX: &str = "uploads";

const MAX_EXTENSION_LEN: usize = 10;

/// A file received in a multipart request, not yet written to disk
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Filesystem-backed upload store
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it is missing
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload dir {}", self.dir.display()))
    }

    /// Write `upload` under a fresh name and return its public relative path
    pub async fn persist(&self, upload: &PendingUpload) -> Result<String> {
        let stored_name = stored_name(Uuid::new_v4(), &upload.original_name);

        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&stored_name), &upload.bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", stored_name))?;

        info!(
            original = %upload.original_name,
            stored = %stored_name,
            bytes = upload.bytes.len(),
            "Stored upload"
        );

        Ok(format!("{}/{}", PUBLIC_PREFIX, stored_name))
    }

    /// Delete a file previously returned by [`persist`](Self::persist)
    ///
    /// A file that is already gone is not an error. Paths outside the
    /// store are refused.
    pub async fn remove(&self, public_path: &str) -> Result<()> {
        let name = stored_file_name(public_path)
            .ok_or_else(|| anyhow::anyhow!("Not a stored upload path: {}", public_path))?;

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                info!(stored = %name, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove upload {}", name)),
        }
    }
}

/// File name inside the store for a public `uploads/<name>` path
fn stored_file_name(public_path: &str) -> Option<&str> {
    let name = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return None;
    }
    Some(name)
}

/// Extension of `original_name`, lower-cased, if it is safe to keep
fn extension(original_name: &str) -> Option<String> {
    let (stem, ext) = original_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn stored_name(id: Uuid, original_name: &str) -> String {
    match extension(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}
