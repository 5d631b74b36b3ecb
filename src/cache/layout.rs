use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::models::ArtifactPaths;

pub const MANIFEST_SUFFIX: &str = ".json";
pub const NEGATIVE_MARKER_SUFFIX: &str = ".json.noimage";

static MANIFEST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\.json$").expect("static regex"));

/// File naming for the date-keyed cache directory
#[derive(Debug, Clone)]
pub struct CacheLayout {
    base_path: PathBuf,
}

impl CacheLayout {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn manifest_path(&self, date_key: &str) -> PathBuf {
        self.base_path.join(format!("{date_key}{MANIFEST_SUFFIX}"))
    }

    pub fn negative_marker_path(&self, date_key: &str) -> PathBuf {
        self.base_path.join(format!("{date_key}{NEGATIVE_MARKER_SUFFIX}"))
    }

    pub fn artifact_paths(&self, date_key: &str, extension: &str) -> ArtifactPaths {
        ArtifactPaths::for_date(&self.base_path, date_key, extension)
    }

    /// Whether `file_name` names a manifest (`YYYY-MM-DD.json`)
    pub fn is_manifest_name(file_name: &str) -> bool {
        MANIFEST_NAME.is_match(file_name)
    }
}
