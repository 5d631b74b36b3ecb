//! Fetch-and-derive pipeline
//!
//! One run resolves today's cache state and, on a miss, fetches the day's
//! record, downloads the image, derives the wallpaper and thumbnail, and
//! writes the manifest. Every failure ends in a fallback lookup instead of
//! an error.

pub mod outcome;

pub use outcome::{FailureReason, RunOutcome};

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::cache::{CacheResolver, CacheState, DirectoryListing, FsDirectoryListing};
use crate::config::Config;
use crate::errors::{AppError, AppResult, ImageError};
use crate::imaging::{self, AspectRatio};
use crate::models::{ArtifactPaths, DailyRecord};
use crate::sources::ApodSource;
use crate::utils::{HttpClient, UrlUtils};

pub struct ApodPipeline<C, L = FsDirectoryListing> {
    client: C,
    source: ApodSource,
    resolver: CacheResolver<L>,
    aspect: AspectRatio,
    thumbnail_size: u32,
    mark_transport_failures: bool,
}

impl<C: HttpClient> ApodPipeline<C> {
    pub fn new(config: &Config, base_path: PathBuf, client: C) -> AppResult<Self> {
        Self::with_resolver(config, CacheResolver::new(base_path), client)
    }
}

impl<C: HttpClient, L: DirectoryListing> ApodPipeline<C, L> {
    pub fn with_resolver(config: &Config, resolver: CacheResolver<L>, client: C) -> AppResult<Self> {
        Ok(Self {
            client,
            source: ApodSource::new(&config.api),
            resolver,
            aspect: config.imaging.aspect_ratio()?,
            thumbnail_size: config.imaging.thumbnail_size,
            mark_transport_failures: config.cache.mark_transport_failures,
        })
    }

    pub fn resolver(&self) -> &CacheResolver<L> {
        &self.resolver
    }

    /// Make `date_key`'s artifacts available, or report the best fallback.
    ///
    /// Only unexpected filesystem failures (e.g. an unreadable cache
    /// directory) are returned as errors.
    pub async fn run(&self, date_key: &str) -> AppResult<RunOutcome> {
        match self.resolver.resolve(date_key).await? {
            CacheState::Complete(manifest) => {
                info!("Already have the APOD for {}", date_key);
                return Ok(RunOutcome::Cached(manifest));
            }
            CacheState::Negative => {
                info!("APOD for {} failed earlier today, not retrying", date_key);
                return self.fall_back(FailureReason::PreviouslyFailed).await;
            }
            CacheState::Absent => {}
        }

        let record = match self.source.fetch_metadata(&self.client, date_key).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not get the APOD record for {}: {}", date_key, e);
                if e.marks_negative() || self.mark_transport_failures {
                    self.write_negative_marker(date_key, &e).await;
                }
                return self.fall_back(FailureReason::from_error(&e)).await;
            }
        };

        let paths = self.artifact_paths(&record, date_key)?;
        match self.produce(record, &paths, date_key).await {
            Ok(manifest) => Ok(RunOutcome::Fetched(manifest)),
            Err(e) => {
                warn!("Failed to build the APOD artifacts for {}: {}", date_key, e);
                self.discard(&paths, date_key).await;
                self.write_negative_marker(date_key, &e).await;
                self.fall_back(FailureReason::from_error(&e)).await
            }
        }
    }

    /// Download the source image and write the wallpaper and thumbnail next to it
    pub async fn derive_artifacts(
        &self,
        record: DailyRecord,
        paths: &ArtifactPaths,
    ) -> AppResult<DailyRecord> {
        let image_url = record
            .image_url()
            .ok_or_else(|| AppError::malformed(format!("APOD for {} has no image URL", record.date)))?
            .to_string();

        info!("Getting the image from {}", UrlUtils::obfuscate_credentials(&image_url));
        let bytes = self
            .client
            .fetch_bytes(&image_url)
            .await
            .map_err(|e| ImageError::download(UrlUtils::obfuscate_credentials(&image_url), e))?;
        fs::write(&paths.original, &bytes)
            .await
            .map_err(|e| ImageError::write(&paths.original, e))?;
        info!("Saved it at {}", paths.original.display());

        let original = imaging::open_image(&paths.original)?;
        debug!(
            "Decoded {}x{} source image",
            original.width(),
            original.height()
        );

        let wallpaper = imaging::create_wallpaper(&original, self.aspect);
        imaging::save_image(&wallpaper, &paths.wallpaper)?;
        info!(
            "Saved a {} wallpaper copy ({}x{}) at {}",
            self.aspect,
            wallpaper.width(),
            wallpaper.height(),
            paths.wallpaper.display()
        );

        let thumbnail = imaging::create_thumbnail(&original, self.thumbnail_size);
        imaging::save_image(&thumbnail, &paths.thumbnail)?;
        info!("Saved a thumbnail at {}", paths.thumbnail.display());

        Ok(record.attach_artifacts(paths))
    }

    fn artifact_paths(&self, record: &DailyRecord, date_key: &str) -> AppResult<ArtifactPaths> {
        let extension = record
            .image_url()
            .and_then(UrlUtils::path_extension)
            .ok_or_else(|| AppError::malformed(format!("APOD for {} has no image extension", record.date)))?;
        Ok(self.resolver.layout().artifact_paths(date_key, &extension))
    }

    /// Derive everything and persist the manifest; any error leaves cleanup to the caller
    async fn produce(
        &self,
        record: DailyRecord,
        paths: &ArtifactPaths,
        date_key: &str,
    ) -> AppResult<PathBuf> {
        let record = self.derive_artifacts(record, paths).await?;

        info!("Saving APOD manifest with local images");
        let manifest = self.resolver.layout().manifest_path(date_key);
        fs::write(&manifest, record.to_manifest_json()?).await?;
        info!("Saved manifest at {}", manifest.display());
        Ok(manifest)
    }

    /// Remove whatever a failed derivation left behind, manifest included
    async fn discard(&self, paths: &ArtifactPaths, date_key: &str) {
        let manifest = self.resolver.layout().manifest_path(date_key);
        for path in paths.iter().chain(std::iter::once(manifest.as_path())) {
            remove_if_present(path).await;
        }
    }

    async fn write_negative_marker(&self, date_key: &str, error: &AppError) {
        let marker = self.resolver.layout().negative_marker_path(date_key);
        match fs::write(&marker, format!("{error}\n")).await {
            Ok(()) => info!("Recorded failure for {} at {}", date_key, marker.display()),
            Err(e) => warn!("Failed to write negative marker {}: {}", marker.display(), e),
        }
    }

    async fn fall_back(&self, reason: FailureReason) -> AppResult<RunOutcome> {
        match self.resolver.fallback().await? {
            Some(manifest) => {
                info!("Falling back to {} ({})", manifest.display(), reason);
                Ok(RunOutcome::FellBack { manifest, reason })
            }
            None => {
                warn!("{} ({})", AppError::NoFallbackAvailable, reason);
                Ok(RunOutcome::Unavailable { reason })
            }
        }
    }
}

async fn remove_if_present(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial artifact {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}
