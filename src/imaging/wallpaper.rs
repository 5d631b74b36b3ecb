//! Aspect-ratio wallpaper crop
//!
//! The wallpaper is produced by rotating and cropping only. Pixels are never
//! resampled, so the source's pixel density is kept.

use image::DynamicImage;

use super::AspectRatio;

/// A rectangle inside an image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropBox {
    /// `(left, top, right, bottom)` corners
    pub fn corners(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Geometry of a wallpaper transformation, computed without touching pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallpaperPlan {
    /// Portrait sources are turned a quarter so the result is landscape
    pub rotate: bool,
    /// Centered crop applied after the rotation, if any
    pub crop: Option<CropBox>,
    pub output_width: u32,
    pub output_height: u32,
}

/// Work out how an image of `width`×`height` becomes a wallpaper of `aspect`.
///
/// Guess dimensions use integer truncation. At most one of the vertical and
/// horizontal crops applies.
pub fn plan_wallpaper(width: u32, height: u32, aspect: AspectRatio) -> WallpaperPlan {
    let rotate = height > width;
    let (w, h) = if rotate { (height, width) } else { (width, height) };

    let aw = u64::from(aspect.width());
    let ah = u64::from(aspect.height());
    // Extreme ratios saturate rather than wrap
    let guess_height = u32::try_from(u64::from(w) * ah / aw).unwrap_or(u32::MAX);
    let guess_width = u32::try_from(u64::from(h) * aw / ah).unwrap_or(u32::MAX);

    let crop = if h > guess_height {
        Some(CropBox {
            x: 0,
            y: (h - guess_height) / 2,
            width: w,
            height: guess_height,
        })
    } else if w > guess_width {
        Some(CropBox {
            x: (w - guess_width) / 2,
            y: 0,
            width: guess_width,
            height: h,
        })
    } else {
        None
    };

    let (output_width, output_height) = match crop {
        Some(b) => (b.width, b.height),
        None => (w, h),
    };

    WallpaperPlan {
        rotate,
        crop,
        output_width,
        output_height,
    }
}

/// Rotate (if portrait) and center-crop `image` to `aspect`.
pub fn create_wallpaper(image: &DynamicImage, aspect: AspectRatio) -> DynamicImage {
    let plan = plan_wallpaper(image.width(), image.height(), aspect);

    // Counter-clockwise quarter turn
    let oriented = if plan.rotate {
        image.rotate270()
    } else {
        image.clone()
    };

    match plan.crop {
        Some(b) => oriented.crop_imm(b.x, b.y, b.width, b.height),
        None => oriented,
    }
}
