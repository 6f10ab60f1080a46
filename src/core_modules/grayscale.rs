// THEORY:
// The first stage of the per-frame pipeline collapses the captured BGR frame
// into a single luminance channel. Every downstream stage (binarization,
// morphology, labelling) is defined on intensity images only, so this is the
// bridge between the capture format and the analysis format.
//
// The conversion uses the standard ITU-R BT.601 luma weights. Note the BGR
// byte order of the source: blue is channel 0, red is channel 2.

use crate::core_modules::error::VisionError;
use crate::core_modules::image::Image;

/// Converts a 3-channel BGR image into a 1-channel luminance image.
///
/// `gray = 0.299 R + 0.587 G + 0.114 B`, truncated to `u8`. Source and
/// destination must share width and height; the destination must already be
/// a 1-channel image (allocated by the caller, matching the explicit buffer
/// lifecycle of the pipeline).
pub fn bgr_to_gray(src: &Image, dst: &mut Image) -> Result<(), VisionError> {
    src.require_channels(3)?;
    dst.require_channels(1)?;
    src.require_same_dimensions(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            let (b, g, r) = src.bgr(x, y);
            let gray =
                (f32::from(r) * 0.299 + f32::from(g) * 0.587 + f32::from(b) * 0.114) as u8;
            dst.set_intensity(x, y, gray);
        }
    }
    Ok(())
}
