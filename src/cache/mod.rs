//! Date-keyed artifact cache
//!
//! Each day is in exactly one of three states on disk:
//!
//! - **Complete**: `D.json` exists, along with the three images it references
//! - **Negative**: `D.json.noimage` exists; the day failed and is not retried
//! - **Absent**: neither file exists
//!
//! The resolver only reads the filesystem. Writing manifests and markers is
//! the pipeline's job.

pub mod layout;
pub mod listing;

pub use layout::CacheLayout;
pub use listing::{DirectoryListing, FsDirectoryListing, ListedFile, latest_manifest};

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::errors::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Complete(PathBuf),
    Negative,
    Absent,
}

pub struct CacheResolver<L = FsDirectoryListing> {
    layout: CacheLayout,
    listing: L,
}

impl CacheResolver<FsDirectoryListing> {
    pub fn new(base_path: PathBuf) -> Self {
        Self::with_listing(base_path, FsDirectoryListing)
    }
}

impl<L: DirectoryListing> CacheResolver<L> {
    pub fn with_listing(base_path: PathBuf, listing: L) -> Self {
        Self {
            layout: CacheLayout::new(base_path),
            listing,
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// State of `date_key` in the cache. A manifest wins over a marker.
    pub async fn resolve(&self, date_key: &str) -> AppResult<CacheState> {
        let manifest = self.layout.manifest_path(date_key);
        if fs::try_exists(&manifest).await? {
            debug!("Found manifest for {}: {:?}", date_key, manifest);
            return Ok(CacheState::Complete(manifest));
        }

        let marker = self.layout.negative_marker_path(date_key);
        if fs::try_exists(&marker).await? {
            debug!("Found negative marker for {}: {:?}", date_key, marker);
            return Ok(CacheState::Negative);
        }

        debug!("Nothing cached for {}", date_key);
        Ok(CacheState::Absent)
    }

    /// Most recently created manifest in the cache directory, if any
    pub async fn fallback(&self) -> AppResult<Option<PathBuf>> {
        let files = self.listing.list(self.layout.base_path()).await?;
        let latest = latest_manifest(&files);
        debug!(
            "Fallback scan of {:?}: {} files, selected {:?}",
            self.layout.base_path(),
            files.len(),
            latest
        );
        Ok(latest)
    }

    pub fn base_path(&self) -> &Path {
        self.layout.base_path()
    }
}
