//! Persistence of files attached to `getValue` requests.
//!
//! Files are written once and never read back. Each stored name is prefixed
//! with the current Unix time in milliseconds and a random number so that
//! repeated uploads of the same file do not overwrite each other:
//!
//! ```text
//! uploads/1735689600123-482019377-report.csv
//! ```

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use rand::Rng;
use tracing::info;

use crate::error::UploadError;

/// Upper bound (inclusive) of the random part of a stored file name.
const MAX_RANDOM_SUFFIX: u32 = 1_000_000_000;

/// Name used when the client sent no usable file name.
const FALLBACK_FILE_NAME: &str = "upload";

/// A file received in a multipart request, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field the file was attached to
    pub field_name: String,

    /// File name as sent by the client
    pub file_name: String,

    /// Content type as sent by the client
    pub content_type: Option<String>,

    /// File contents
    pub data: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Size formatted as kilobytes with two decimals, e.g. `"1.50 KB"`.
    pub fn size_kb(&self) -> String {
        format!("{:.2} KB", self.size() as f64 / 1024.0)
    }
}

/// Writes uploaded files into a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the file under a fresh unique name and return its path.
    pub async fn save(&self, file: &UploadedFile) -> Result<PathBuf, UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| UploadError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(unique_file_name(&file.file_name));
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(|source| UploadError::Write {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            size = %file.size_kb(),
            "File saved"
        );

        Ok(path)
    }
}

/// Build `<millis>-<random>-<name>` for a client-supplied file name.
pub fn unique_file_name(original: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = rand::rng().random_range(0..=MAX_RANDOM_SUFFIX);

    format!("{}-{}-{}", millis, suffix, base_name(original))
}

/// Strip any directory components so the file always lands inside the store.
fn base_name(original: &str) -> &str {
    original
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_FILE_NAME)
}
