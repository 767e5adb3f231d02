//! RGBA buffers to extractor input.

use huekit_core::{ExtractRequest, FilterOptions, ImageView, Rgb8};

const OPAQUE_ALPHA: u8 = 128;

/// The opaque pixels of `image` (alpha >= 128), row-major.
pub fn opaque_pixels(image: &ImageView<'_>) -> Vec<Rgb8> {
    image
        .pixels()
        .filter(|&(_, alpha)| alpha >= OPAQUE_ALPHA)
        .map(|(rgb, _)| rgb)
        .collect()
}

/// Builds an extraction request over the opaque pixels of `image`.
pub fn request_for_image(
    image: &ImageView<'_>,
    k: usize,
    filter_options: FilterOptions,
    seed: Option<u64>,
) -> ExtractRequest {
    ExtractRequest {
        pixels: opaque_pixels(image),
        k,
        filter_options,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_pixels_are_dropped() {
        let data = [
            255, 0, 0, 255, //
            0, 255, 0, 127, //
            0, 0, 255, 128, //
            9, 9, 9, 0,
        ];
        let image = ImageView::new(2, 2, &data).unwrap();
        assert_eq!(
            opaque_pixels(&image),
            [Rgb8::new(255, 0, 0), Rgb8::new(0, 0, 255)]
        );
    }

    #[test]
    fn request_carries_options() {
        let data = [10, 200, 30, 255];
        let image = ImageView::new(1, 1, &data).unwrap();
        let filter = FilterOptions {
            saturation: 0.1,
            lightness: 0.2,
        };
        let request = request_for_image(&image, 4, filter, Some(9));
        assert_eq!(request.pixels, [Rgb8::new(10, 200, 30)]);
        assert_eq!(request.k, 4);
        assert_eq!(request.filter_options, filter);
        assert_eq!(request.seed, Some(9));
    }
}
