// THEORY:
// Binarization reduces the luminance image to a two-level foreground /
// background map, which is the working representation for morphology and
// labelling. Foreground is 255, background is 0; the comparison is a strict
// `>` against the threshold. Negation exists because depending on lighting
// the objects of interest can come out darker than the belt: the pipeline
// thresholds for the bright side and flips when the profile says so.

use crate::core_modules::error::VisionError;
use crate::core_modules::image::Image;

/// Foreground value of a binary image.
pub const FOREGROUND: u8 = 255;
/// Background value of a binary image.
pub const BACKGROUND: u8 = 0;

/// Thresholds a grayscale image into a binary image: `255` where the source
/// sample is strictly greater than `threshold`, `0` otherwise.
pub fn threshold(src: &Image, dst: &mut Image, t: u8) -> Result<(), VisionError> {
    src.require_channels(1)?;
    dst.require_channels(1)?;
    src.require_same_dimensions(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            let value = if src.intensity(x, y) > t {
                FOREGROUND
            } else {
                BACKGROUND
            };
            dst.set_intensity(x, y, value);
        }
    }
    Ok(())
}

/// In-place negation of a 1-channel image: `v <- 255 - v`.
pub fn negate(img: &mut Image) -> Result<(), VisionError> {
    img.require_channels(1)?;
    for v in img.data_mut() {
        *v = 255 - *v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::image::LEVELS_8BIT;

    fn gray_ramp() -> Image {
        let mut img = Image::new(16, 1, 1, LEVELS_8BIT).unwrap();
        for (i, v) in img.data_mut().iter_mut().enumerate() {
            *v = (i * 16) as u8;
        }
        img
    }

    #[test]
    fn threshold_is_strict_greater_than() {
        let mut src = Image::new(3, 1, 1, LEVELS_8BIT).unwrap();
        src.data_mut().copy_from_slice(&[99, 100, 101]);
        let mut dst = Image::new(3, 1, 1, LEVELS_8BIT).unwrap();
        threshold(&src, &mut dst, 100).unwrap();
        assert_eq!(dst.data(), &[0, 0, 255]);
    }

    #[test]
    fn threshold_is_monotonic_in_t() {
        // Raising the threshold can only turn 255s into 0s, never the reverse.
        let src = gray_ramp();
        let mut low = Image::new(16, 1, 1, LEVELS_8BIT).unwrap();
        let mut high = Image::new(16, 1, 1, LEVELS_8BIT).unwrap();
        threshold(&src, &mut low, 40).unwrap();
        threshold(&src, &mut high, 200).unwrap();

        for (l, h) in low.data().iter().zip(high.data()) {
            assert!(!(l == &0 && h == &255));
        }
    }

    #[test]
    fn negate_is_an_involution() {
        let mut img = gray_ramp();
        let original = img.data().to_vec();
        negate(&mut img).unwrap();
        assert_eq!(img.data()[0], 255);
        negate(&mut img).unwrap();
        assert_eq!(img.data(), original.as_slice());
    }

    #[test]
    fn rejects_color_images() {
        let mut color = Image::new(2, 2, 3, LEVELS_8BIT).unwrap();
        assert!(negate(&mut color).is_err());
    }
}
