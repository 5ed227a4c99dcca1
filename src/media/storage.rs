//! On-disk storage for uploaded media.
//!
//! Files get UUID names and live in directories sharded by the first two
//! characters of the name:
//! ```text
//! {base_path}/
//! ├── ab/
//! │   └── ab12cd34-5678-90ab-cdef-123456789012.jpg
//! └── cd/
//!     └── cd90ab12-3456-7890-abcd-ef1234567890.mp4
//! ```
//! The same layout is served under the public prefix.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::Result;

/// A file written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// UUID-based file name.
    pub stored_name: String,
    /// URL path the file is served under.
    pub public_path: String,
}

/// Media storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    base_path: PathBuf,
    public_prefix: String,
}

impl MediaStorage {
    /// Create storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_path,
            public_prefix,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Write `content` under a fresh name keeping the original extension.
    pub async fn save(&self, content: &[u8], original_name: &str) -> Result<StoredMedia> {
        let stored_name = Self::generate_stored_name(original_name);
        let file_path = self.file_path(&stored_name);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&file_path, content).await?;

        Ok(StoredMedia {
            public_path: self.public_path(&stored_name),
            stored_name,
        })
    }

    /// Delete a stored file.
    ///
    /// Returns `false` if it did not exist.
    pub async fn delete(&self, stored_name: &str) -> Result<bool> {
        match fs::remove_file(self.file_path(stored_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete several files, logging instead of failing.
    pub async fn delete_all(&self, stored: &[StoredMedia]) {
        for media in stored {
            if let Err(e) = self.delete(&media.stored_name).await {
                tracing::warn!("Failed to remove {}: {}", media.stored_name, e);
            }
        }
    }

    /// Whether a stored file exists.
    #[cfg(test)]
    pub async fn exists(&self, stored_name: &str) -> bool {
        fs::try_exists(self.file_path(stored_name))
            .await
            .unwrap_or(false)
    }

    /// Full path for a stored name: `{base_path}/{shard}/{stored_name}`.
    pub fn file_path(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(Self::shard(stored_name)).join(stored_name)
    }

    /// URL path for a stored name: `{public_prefix}/{shard}/{stored_name}`.
    pub fn public_path(&self, stored_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_prefix,
            Self::shard(stored_name),
            stored_name
        )
    }

    fn shard(stored_name: &str) -> &str {
        stored_name.get(..2).unwrap_or(stored_name)
    }

    fn extract_extension(filename: &str) -> String {
        Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }

    /// Generate a new UUID-based stored name with the original's extension.
    pub fn generate_stored_name(original_name: &str) -> String {
        format!(
            "{}.{}",
            Uuid::new_v4(),
            Self::extract_extension(original_name)
        )
    }
}
