use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

/// Metadata for one day's picture, as returned by the API and persisted in
/// the day's manifest.
///
/// Fields the program does not interpret (explanation, copyright, ...) are
/// kept in `extra` so the manifest carries the full response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagepath: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallpath: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbpath: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Local files derived from one day's picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub original: PathBuf,
    pub wallpaper: PathBuf,
    pub thumbnail: PathBuf,
}

impl ArtifactPaths {
    /// `{base}/{date}.original{ext}`, `.wall{ext}` and `.thumb{ext}`
    pub fn for_date(base: &Path, date_key: &str, extension: &str) -> Self {
        Self {
            original: base.join(format!("{date_key}.original{extension}")),
            wallpaper: base.join(format!("{date_key}.wall{extension}")),
            thumbnail: base.join(format!("{date_key}.thumb{extension}")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            self.original.as_path(),
            self.wallpaper.as_path(),
            self.thumbnail.as_path(),
        ]
        .into_iter()
    }
}

impl DailyRecord {
    /// Decode an API response body
    pub fn from_json(body: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::malformed(format!("Invalid APOD payload: {e}")))
    }

    /// The image to download, preferring the high resolution one
    pub fn image_url(&self) -> Option<&str> {
        self.hdurl
            .as_deref()
            .or(self.url.as_deref())
            .filter(|u| !u.trim().is_empty())
    }

    /// Whether the day's media is a still image. Missing `media_type` counts as image.
    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_none_or(|t| t.eq_ignore_ascii_case("image"))
    }

    pub fn attach_artifacts(mut self, paths: &ArtifactPaths) -> Self {
        self.imagepath = Some(paths.original.clone());
        self.wallpath = Some(paths.wallpaper.clone());
        self.thumbpath = Some(paths.thumbnail.clone());
        self
    }

    pub fn artifacts(&self) -> Option<ArtifactPaths> {
        Some(ArtifactPaths {
            original: self.imagepath.clone()?,
            wallpaper: self.wallpath.clone()?,
            thumbnail: self.thumbpath.clone()?,
        })
    }

    pub fn to_manifest_json(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "copyright": "Jane Doe",
        "date": "2024-01-01",
        "explanation": "A galaxy far away.",
        "hdurl": "https://apod.nasa.gov/apod/image/2401/galaxy_big.jpg",
        "media_type": "image",
        "service_version": "v1",
        "title": "A Galaxy",
        "url": "https://apod.nasa.gov/apod/image/2401/galaxy.jpg"
    }"#;

    #[test]
    fn test_decode_keeps_unknown_fields() {
        let record = DailyRecord::from_json(PAYLOAD.as_bytes()).unwrap();
        assert_eq!(record.title, "A Galaxy");
        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.extra.get("copyright"), Some(&Value::from("Jane Doe")));
        assert_eq!(record.extra.get("service_version"), Some(&Value::from("v1")));
        assert!(record.imagepath.is_none());
        assert!(record.is_image());
    }

    #[test]
    fn test_image_url_prefers_hd() {
        let mut record = DailyRecord::from_json(PAYLOAD.as_bytes()).unwrap();
        assert_eq!(
            record.image_url(),
            Some("https://apod.nasa.gov/apod/image/2401/galaxy_big.jpg")
        );

        record.hdurl = None;
        assert_eq!(
            record.image_url(),
            Some("https://apod.nasa.gov/apod/image/2401/galaxy.jpg")
        );

        record.url = None;
        assert_eq!(record.image_url(), None);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            DailyRecord::from_json(b"<html>502</html>"),
            Err(AppError::MalformedResponse { .. })
        ));
        assert!(matches!(
            DailyRecord::from_json(br#"{"date": "2024-01-01"}"#),
            Err(AppError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_video_is_not_image() {
        let record = DailyRecord::from_json(
            br#"{"title": "T", "date": "2024-01-02", "media_type": "video", "url": "https://www.youtube.com/embed/x"}"#,
        )
        .unwrap();
        assert!(!record.is_image());
    }

    #[test]
    fn test_manifest_contains_paths_and_remote_fields() {
        let paths = ArtifactPaths::for_date(Path::new("/cache"), "2024-01-01", ".jpg");
        let record = DailyRecord::from_json(PAYLOAD.as_bytes())
            .unwrap()
            .attach_artifacts(&paths);

        let json: Value = serde_json::from_slice(&record.to_manifest_json().unwrap()).unwrap();
        assert_eq!(json["imagepath"], "/cache/2024-01-01.original.jpg");
        assert_eq!(json["wallpath"], "/cache/2024-01-01.wall.jpg");
        assert_eq!(json["thumbpath"], "/cache/2024-01-01.thumb.jpg");
        assert_eq!(json["title"], "A Galaxy");
        assert_eq!(json["explanation"], "A galaxy far away.");
        assert_eq!(json["hdurl"], "https://apod.nasa.gov/apod/image/2401/galaxy_big.jpg");

        // Reading the manifest back gives the same record
        let reread: DailyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(reread, record);
        assert_eq!(reread.artifacts(), Some(paths));
    }
}
