//! Error type definitions for apod-wallpaper
//!
//! Expected failures (network, image processing, unusable responses) each
//! have their own variant so the pipeline can decide whether to fall back,
//! record a negative marker, or both.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The remote source could not be reached or answered with an error status
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Downloading, decoding or saving one of the day's images failed
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// The remote answered but the payload is unusable
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// No earlier manifest exists to fall back to
    #[error("No fallback available")]
    NoFallbackAvailable,

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors outside of image handling
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest serialization failures
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while talking to the remote source
#[derive(Error, Debug)]
pub enum TransportError {
    /// DNS, connection, timeout or body read failures
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Non-2xx responses
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Errors raised while producing the day's image artifacts
#[derive(Error, Debug)]
pub enum ImageError {
    /// The source image could not be downloaded
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// The downloaded bytes are not a decodable raster image
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Encoding a derived image failed
    #[error("Failed to save {}: {message}", path.display())]
    Save { path: PathBuf, message: String },

    /// Writing raw bytes to disk failed
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl AppError {
    /// Create a malformed response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this failure should make today's date sticky-negative
    pub fn marks_negative(&self) -> bool {
        matches!(self, Self::Image(_) | Self::MalformedResponse { .. })
    }
}

impl TransportError {
    pub fn request<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Request {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }
}

impl ImageError {
    pub fn download<U: Into<String>, M: ToString>(url: U, message: M) -> Self {
        Self::Download {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn decode<M: ToString>(path: &Path, message: M) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn save<M: ToString>(path: &Path, message: M) -> Self {
        Self::Save {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn write<M: ToString>(path: &Path, message: M) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_negative() {
        assert!(AppError::malformed("no image url").marks_negative());
        assert!(
            AppError::from(ImageError::decode(Path::new("x.jpg"), "bad data")).marks_negative()
        );
        assert!(!AppError::from(TransportError::status("https://example.com", 503)).marks_negative());
        assert!(!AppError::NoFallbackAvailable.marks_negative());
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::from(TransportError::status("https://example.com/apod", 500));
        assert_eq!(
            err.to_string(),
            "Transport error: HTTP 500 from https://example.com/apod"
        );

        let err = ImageError::save(Path::new("/tmp/2024-01-01.wall.jpg"), "unsupported");
        assert_eq!(
            err.to_string(),
            "Failed to save /tmp/2024-01-01.wall.jpg: unsupported"
        );
    }
}
