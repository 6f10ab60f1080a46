// THEORY:
// Labelling alone produces every connected region in the frame, including
// shadows, belt markings and stray debris. The filter layer decides which
// blobs are plausible coins before any of them reach the tracker. Two
// independent tests compose here:
//
// 1.  **Color Rejection**: coins are metallic and low-saturation. A small
//     region of interest around the blob centroid is averaged in the original
//     color frame, converted to HSV by hand (max/min/delta with the six-way
//     hue case split), and matched against named reject buckets. Saturated
//     red/green/blue/yellow objects are discarded outright; "black" uses a
//     brightness cutoff supplied by the active video profile because it is a
//     lighting property of the footage, not a constant of the algorithm.
// 2.  **Shape Filter**: a coin's bounding box is close to square and its fill
//     is close to a disc. Aspect ratio (normalized to <= 1) and circularity
//     (from the bounding-box perimeter approximation) are compared against
//     profile minima.
//
// Degenerate inputs never error: an empty ROI rejects nothing, a zero-sized
// box simply fails the shape test.

use tracing::debug;

use crate::core_modules::blob::Blob;
use crate::core_modules::error::VisionError;
use crate::core_modules::image::Image;

/// Side of the square color-sampling window centered on the blob centroid.
const COLOR_ROI_SIDE: usize = 5;

/// A color in HSV space: hue in degrees [0, 360), saturation and value in
/// [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Named color bands that disqualify a blob from being a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectBucket {
    Red,
    Green,
    Blue,
    Yellow,
    Black,
}

/// Converts normalized RGB samples (each in [0, 1]) to HSV using the standard
/// max/min/delta formulation.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if s == 0.0 {
        0.0
    } else {
        let mut h = if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };
        if h < 0.0 {
            h += 360.0;
        }
        h
    };

    Hsv { h, s, v }
}

/// Averages the BGR samples of the ROI around `blob`'s centroid, clipped to
/// image bounds. Returns normalized (r, g, b) in [0, 1], or `None` when the
/// clipped ROI contains no pixels.
pub fn sample_centroid_color(
    color: &Image,
    blob: &Blob,
) -> Result<Option<(f32, f32, f32)>, VisionError> {
    color.require_channels(3)?;

    let half = COLOR_ROI_SIDE / 2;
    let (cx, cy) = (blob.centroid.x as isize, blob.centroid.y as isize);
    let mut sum_r: u64 = 0;
    let mut sum_g: u64 = 0;
    let mut sum_b: u64 = 0;
    let mut count: u64 = 0;

    for y in cy - half as isize..=cy + half as isize {
        for x in cx - half as isize..=cx + half as isize {
            if x < 0 || y < 0 || x as usize >= color.width() || y as usize >= color.height() {
                continue;
            }
            let (b, g, r) = color.bgr(x as usize, y as usize);
            sum_b += u64::from(b);
            sum_g += u64::from(g);
            sum_r += u64::from(r);
            count += 1;
        }
    }

    if count == 0 {
        return Ok(None);
    }
    let norm = |sum: u64| (sum as f32 / count as f32) / 255.0;
    Ok(Some((norm(sum_r), norm(sum_g), norm(sum_b))))
}

/// Classifies the blob's sampled mean color against the reject buckets.
/// Returns the matching bucket, or `None` when the color is acceptable.
/// `black_value_cutoff` comes from the active video profile; `None` disables
/// the black band entirely.
pub fn color_rejection(
    color: &Image,
    blob: &Blob,
    black_value_cutoff: Option<f32>,
) -> Result<Option<RejectBucket>, VisionError> {
    let Some((r, g, b)) = sample_centroid_color(color, blob)? else {
        // Empty ROI: nothing to judge, keep the blob.
        return Ok(None);
    };
    let hsv = rgb_to_hsv(r, g, b);

    let bucket = if (hsv.h >= 340.0 || hsv.h <= 20.0) && hsv.s > 0.5 && hsv.v > 0.3 {
        Some(RejectBucket::Red)
    } else if (75.0..=175.0).contains(&hsv.h) && hsv.s > 0.40 && hsv.v > 0.20 {
        Some(RejectBucket::Green)
    } else if (180.0..=280.0).contains(&hsv.h) && hsv.s > 0.4 && hsv.v > 0.3 {
        Some(RejectBucket::Blue)
    } else if (45.0..=75.0).contains(&hsv.h) && hsv.s > 0.7 && hsv.v > 0.6 {
        Some(RejectBucket::Yellow)
    } else if black_value_cutoff.is_some_and(|cutoff| hsv.v < cutoff) {
        Some(RejectBucket::Black)
    } else {
        None
    };

    if let Some(bucket) = bucket {
        debug!(
            label = blob.label,
            h = hsv.h,
            s = hsv.s,
            v = hsv.v,
            ?bucket,
            "blob rejected by color band"
        );
    }
    Ok(bucket)
}

/// Shape acceptance test: normalized aspect ratio must be at least
/// `min_aspect` and circularity at least `min_circularity`.
pub fn passes_shape(blob: &Blob, min_aspect: f64, min_circularity: f64) -> bool {
    let aspect = blob.aspect_ratio();
    let circularity = blob.circularity();
    let accepted = aspect >= min_aspect && circularity >= min_circularity;
    if !accepted {
        debug!(
            label = blob.label,
            aspect, circularity, "blob rejected by shape filter"
        );
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::blob::Point;
    use crate::core_modules::image::LEVELS_8BIT;

    fn solid_color_frame(width: usize, height: usize, bgr: (u8, u8, u8)) -> Image {
        let mut img = Image::new(width, height, 3, LEVELS_8BIT).unwrap();
        for px in img.data_mut().chunks_mut(3) {
            px[0] = bgr.0;
            px[1] = bgr.1;
            px[2] = bgr.2;
        }
        img
    }

    fn blob_at(cx: usize, cy: usize) -> Blob {
        Blob {
            label: 1,
            x: cx.saturating_sub(5),
            y: cy.saturating_sub(5),
            width: 10,
            height: 10,
            area: 80,
            centroid: Point { x: cx, y: cy },
        }
    }

    #[test]
    fn hsv_of_primaries() {
        let red = rgb_to_hsv(1.0, 0.0, 0.0);
        assert!((red.h - 0.0).abs() < 1e-3 && (red.s - 1.0).abs() < 1e-6);

        let green = rgb_to_hsv(0.0, 1.0, 0.0);
        assert!((green.h - 120.0).abs() < 1e-3);

        let blue = rgb_to_hsv(0.0, 0.0, 1.0);
        assert!((blue.h - 240.0).abs() < 1e-3);

        let gray = rgb_to_hsv(0.5, 0.5, 0.5);
        assert_eq!(gray.s, 0.0);
        assert_eq!(gray.h, 0.0);
    }

    #[test]
    fn pure_red_roi_is_rejected() {
        // BGR order: red is (0, 0, 255).
        let frame = solid_color_frame(20, 20, (0, 0, 255));
        let blob = blob_at(10, 10);
        let verdict = color_rejection(&frame, &blob, None).unwrap();
        assert_eq!(verdict, Some(RejectBucket::Red));
    }

    #[test]
    fn metallic_gray_roi_is_kept() {
        let frame = solid_color_frame(20, 20, (140, 140, 150));
        let blob = blob_at(10, 10);
        assert_eq!(color_rejection(&frame, &blob, Some(0.12)).unwrap(), None);
    }

    #[test]
    fn black_band_follows_profile_cutoff() {
        let frame = solid_color_frame(20, 20, (25, 25, 25));
        let blob = blob_at(10, 10);
        // v ~ 0.098: rejected under a 0.12 cutoff, kept with the band off.
        assert_eq!(
            color_rejection(&frame, &blob, Some(0.12)).unwrap(),
            Some(RejectBucket::Black)
        );
        assert_eq!(color_rejection(&frame, &blob, None).unwrap(), None);
    }

    #[test]
    fn roi_is_clipped_at_image_corners() {
        let frame = solid_color_frame(8, 8, (0, 0, 255));
        let blob = blob_at(0, 0);
        // Clipped to a 3x3 corner window; still a valid red sample.
        assert_eq!(
            color_rejection(&frame, &blob, None).unwrap(),
            Some(RejectBucket::Red)
        );
    }

    #[test]
    fn shape_filter_drops_elongated_blobs() {
        let mut blob = blob_at(10, 10);
        blob.width = 40;
        blob.height = 8;
        blob.area = 300;
        assert!(!passes_shape(&blob, 0.6, 0.5));

        let round = Blob {
            label: 2,
            x: 0,
            y: 0,
            width: 10,
            height: 10,
            area: 79, // close to a disc of radius 5
            centroid: Point { x: 5, y: 5 },
        };
        assert!(passes_shape(&round, 0.6, 0.5));
    }
}
