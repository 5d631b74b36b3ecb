//! Raster helpers for the daily artifacts
//!
//! - [`wallpaper`]: rotate and center-crop to a target aspect ratio
//! - [`thumbnail`]: bounded, aspect-preserving downscale
//!
//! Decoding and encoding go through the `image` crate; the output format is
//! picked from the destination file extension.

pub mod thumbnail;
pub mod wallpaper;

pub use thumbnail::create_thumbnail;
pub use wallpaper::{CropBox, WallpaperPlan, create_wallpaper, plan_wallpaper};

use image::DynamicImage;
use std::fmt;
use std::path::Path;

use crate::errors::{AppError, AppResult, ImageError, ImageResult};

/// Target width:height ratio, both components non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> AppResult<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::configuration(format!(
                "Aspect ratio components must be non-zero, got {width}:{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Decode the image stored at `path`
pub fn open_image(path: &Path) -> ImageResult<DynamicImage> {
    image::ImageReader::open(path)
        .map_err(|e| ImageError::decode(path, e))?
        .with_guessed_format()
        .map_err(|e| ImageError::decode(path, e))?
        .decode()
        .map_err(|e| ImageError::decode(path, e))
}

/// Encode `image` to `path`, format chosen by the extension
pub fn save_image(image: &DynamicImage, path: &Path) -> ImageResult<()> {
    image.save(path).map_err(|e| ImageError::save(path, e))
}
