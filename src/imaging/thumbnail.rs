use image::DynamicImage;

/// Scale `image` down to fit inside `max_size`×`max_size`, keeping its aspect
/// ratio. Images already inside the box are returned unchanged.
pub fn create_thumbnail(image: &DynamicImage, max_size: u32) -> DynamicImage {
    if image.width() <= max_size && image.height() <= max_size {
        return image.clone();
    }
    image.thumbnail(max_size, max_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use rstest::rstest;

    #[rstest]
    #[case(4000, 3000, 128, 96)]
    #[case(3000, 4000, 96, 128)]
    #[case(1024, 1024, 128, 128)]
    #[case(256, 64, 128, 32)]
    fn test_thumbnail_bounds(
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected_width: u32,
        #[case] expected_height: u32,
    ) {
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let thumb = create_thumbnail(&image, 128);
        assert_eq!((thumb.width(), thumb.height()), (expected_width, expected_height));
    }

    #[test]
    fn test_thumbnail_never_upscales() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(64, 32));
        let thumb = create_thumbnail(&image, 128);
        assert_eq!((thumb.width(), thumb.height()), (64, 32));

        let image = DynamicImage::ImageRgb8(RgbImage::new(128, 10));
        let thumb = create_thumbnail(&image, 128);
        assert_eq!((thumb.width(), thumb.height()), (128, 10));
    }
}
