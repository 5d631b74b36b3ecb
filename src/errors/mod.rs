//! Centralized error handling for apod-wallpaper
//!
//! # Error Categories
//!
//! - **Transport Errors**: the remote source is unreachable or returned a non-2xx status
//! - **Image Errors**: download, decode or save failures for the day's artifacts
//! - **Malformed Responses**: a payload without a usable image reference
//! - **No Fallback**: nothing cached to report instead

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for image artifact Results
pub type ImageResult<T> = Result<T, ImageError>;
