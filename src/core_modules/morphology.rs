// THEORY:
// Binary morphology is the pipeline's noise-control layer. Thresholded frames
// carry speckle (isolated foreground pixels from sensor noise, belt texture)
// and pinholes (reflections punching holes into coin interiors). Opening
// removes the former, closing fills the latter, and together they hand the
// labeler clean, solid regions.
//
// Key algorithmic choices:
// 1.  **Square Structuring Element**: erosion takes the minimum and dilation
//     the maximum of the k x k neighborhood, k odd. On two-level images this
//     is exact set-theoretic erosion/dilation; on grayscale it degrades
//     gracefully to min/max filtering.
// 2.  **Copied Border**: the destination is first copied verbatim from the
//     source, then only the interior (a margin of k/2 on every side) is
//     recomputed. The border band therefore always carries the source values.
// 3.  **Composites Propagate Failure**: open and close run their two stages
//     through a caller-supplied scratch image; if either stage rejects the
//     geometry the composite returns that error unchanged.
//
// A grayscale box blur lives here as well: it shares the kernel validation
// and border convention and is offered by the pipeline as an optional
// smoothing stage ahead of binarization.

use crate::core_modules::error::VisionError;
use crate::core_modules::image::Image;

fn check_pair(src: &Image, dst: &Image, kernel: usize, min: usize) -> Result<(), VisionError> {
    src.require_channels(1)?;
    dst.require_channels(1)?;
    src.require_same_dimensions(dst)?;
    if kernel < min || kernel % 2 == 0 {
        return Err(VisionError::BadKernel { size: kernel, min });
    }
    Ok(())
}

/// Erosion: each interior pixel becomes the minimum of its k x k neighborhood.
pub fn erode(src: &Image, dst: &mut Image, kernel: usize) -> Result<(), VisionError> {
    check_pair(src, dst, kernel, 1)?;
    let half = kernel / 2;
    dst.data_mut().copy_from_slice(src.data());
    if src.width() <= 2 * half || src.height() <= 2 * half {
        // No interior: the whole image is border and stays a verbatim copy.
        return Ok(());
    }

    for y in half..src.height() - half {
        for x in half..src.width() - half {
            let mut minimum = u8::MAX;
            for ky in y - half..=y + half {
                for kx in x - half..=x + half {
                    minimum = minimum.min(src.intensity(kx, ky));
                }
            }
            dst.set_intensity(x, y, minimum);
        }
    }
    Ok(())
}

/// Dilation: each interior pixel becomes the maximum of its k x k neighborhood.
pub fn dilate(src: &Image, dst: &mut Image, kernel: usize) -> Result<(), VisionError> {
    check_pair(src, dst, kernel, 1)?;
    let half = kernel / 2;
    dst.data_mut().copy_from_slice(src.data());
    if src.width() <= 2 * half || src.height() <= 2 * half {
        return Ok(());
    }

    for y in half..src.height() - half {
        for x in half..src.width() - half {
            let mut maximum = u8::MIN;
            for ky in y - half..=y + half {
                for kx in x - half..=x + half {
                    maximum = maximum.max(src.intensity(kx, ky));
                }
            }
            dst.set_intensity(x, y, maximum);
        }
    }
    Ok(())
}

/// Opening: erosion followed by dilation. Removes foreground speckle smaller
/// than the structuring element.
pub fn open(
    src: &Image,
    dst: &mut Image,
    kernel: usize,
    temp: &mut Image,
) -> Result<(), VisionError> {
    erode(src, temp, kernel)?;
    dilate(temp, dst, kernel)?;
    Ok(())
}

/// Closing: dilation followed by erosion. Fills background holes smaller than
/// the structuring element.
pub fn close(
    src: &Image,
    dst: &mut Image,
    kernel: usize,
    temp: &mut Image,
) -> Result<(), VisionError> {
    dilate(src, temp, kernel)?;
    erode(temp, dst, kernel)?;
    Ok(())
}

/// Grayscale box blur over a k x k window, k odd and >= 3. Same copied-border
/// convention as erode/dilate.
pub fn box_blur(src: &Image, dst: &mut Image, kernel: usize) -> Result<(), VisionError> {
    check_pair(src, dst, kernel, 3)?;
    let half = kernel / 2;
    dst.data_mut().copy_from_slice(src.data());
    if src.width() <= 2 * half || src.height() <= 2 * half {
        return Ok(());
    }
    let window = (kernel * kernel) as u32;

    for y in half..src.height() - half {
        for x in half..src.width() - half {
            let mut sum: u32 = 0;
            for ky in y - half..=y + half {
                for kx in x - half..=x + half {
                    sum += u32::from(src.intensity(kx, ky));
                }
            }
            dst.set_intensity(x, y, (sum / window) as u8);
        }
    }
    Ok(())
}
