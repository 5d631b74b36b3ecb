//! Directory listing capability used by the fallback query
//!
//! The query itself ([`latest_manifest`]) is a pure function over listed
//! entries; [`FsDirectoryListing`] is the filesystem-backed source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::layout::CacheLayout;

/// A file in the cache directory and when it was created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl ListedFile {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

#[async_trait]
pub trait DirectoryListing: Send + Sync {
    /// Regular files directly inside `dir`. A missing directory lists as empty.
    async fn list(&self, dir: &Path) -> std::io::Result<Vec<ListedFile>>;
}

/// Lists files with `tokio::fs`, using creation time where the platform
/// reports one and modification time otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectoryListing;

#[async_trait]
impl DirectoryListing for FsDirectoryListing {
    async fn list(&self, dir: &Path) -> std::io::Result<Vec<ListedFile>> {
        if !fs::try_exists(dir).await? {
            debug!("Cache directory does not exist: {:?}", dir);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("Failed to get metadata for {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let created_at = match metadata.created().or_else(|_| metadata.modified()) {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(e) => {
                    warn!("No timestamp for {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            files.push(ListedFile {
                path: entry.path(),
                created_at,
            });
        }

        Ok(files)
    }
}

/// Most recently created manifest among `files`.
///
/// Equal timestamps are broken by file name, so the later date key wins.
pub fn latest_manifest(files: &[ListedFile]) -> Option<PathBuf> {
    files
        .iter()
        .filter_map(|f| {
            f.file_name()
                .filter(|name| CacheLayout::is_manifest_name(name))
                .map(|name| (f, name))
        })
        .max_by(|(a, a_name), (b, b_name)| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a_name.cmp(b_name))
        })
        .map(|(f, _)| f.path.clone())
}
