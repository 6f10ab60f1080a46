// THEORY:
// The `Image` struct is the foundation of the entire engine: a plainly owned,
// contiguous buffer of 8-bit samples with explicit geometry. Every other
// module operates on it and nothing else.
//
// Key architectural principles:
// 1.  **Exclusive Ownership**: An `Image` owns its `Vec<u8>` outright. There is
//     no implicit sharing and no reference counting; "release" is simply
//     `Drop`, which makes double-free and use-after-free unrepresentable.
// 2.  **Explicit Geometry**: Width, height, channel count and row stride are
//     carried alongside the data, and the invariant
//     `data.len() == bytes_per_line * height` is established at construction
//     and never broken afterwards.
// 3.  **BGR Convention**: 3-channel images store samples in (blue, green, red)
//     order per pixel, matching the capture convention of the surrounding
//     platform. 1-channel images are plain intensity.
// 4.  **Fail Early, Mutate Never**: Constructors and accessors validate
//     geometry up front and return `Result`; an operation that fails leaves
//     every buffer untouched.

use crate::core_modules::error::VisionError;

/// Number of intensity levels used everywhere in the engine (8-bit samples).
pub const LEVELS_8BIT: usize = 256;

/// An owned rectangular buffer of 8-bit pixel samples.
///
/// `channels == 1` is a grayscale/binary intensity image; `channels == 3` is a
/// color image in BGR byte order. Samples of row `y`, column `x` live at
/// `y * bytes_per_line + x * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    levels: usize,
    bytes_per_line: usize,
    data: Vec<u8>,
}

impl Image {
    /// Allocates a zero-initialized image with a packed row stride.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        levels: usize,
    ) -> Result<Self, VisionError> {
        if width == 0 || height == 0 || !(channels == 1 || channels == 3) || levels < 2 {
            return Err(VisionError::BadGeometry {
                width,
                height,
                channels,
            });
        }

        let bytes_per_line = width * channels;
        Ok(Self {
            width,
            height,
            channels,
            levels,
            bytes_per_line,
            data: vec![0u8; bytes_per_line * height],
        })
    }

    /// Builds a 3-channel BGR image by copying an externally produced frame
    /// buffer. `stride` is the source row stride in bytes and may exceed
    /// `width * 3` (padded rows); the copy is re-packed to a tight stride.
    pub fn from_bgr_buffer(
        width: usize,
        height: usize,
        stride: usize,
        buffer: &[u8],
    ) -> Result<Self, VisionError> {
        let row_bytes = width * 3;
        if stride < row_bytes {
            return Err(VisionError::BadStride { stride, row_bytes });
        }

        let needed = stride * (height.saturating_sub(1)) + row_bytes;
        if buffer.len() < needed {
            return Err(VisionError::SizeMismatch {
                expected: needed,
                actual: buffer.len(),
            });
        }

        let mut image = Self::new(width, height, 3, LEVELS_8BIT)?;
        for y in 0..height {
            let src_row = &buffer[y * stride..y * stride + row_bytes];
            let dst_start = y * image.bytes_per_line;
            image.data[dst_start..dst_start + row_bytes].copy_from_slice(src_row);
        }
        Ok(image)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Row stride in bytes.
    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Byte offset of pixel (x, y), channel 0. Callers add a channel offset
    /// for the green/red samples of BGR images.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.bytes_per_line + x * self.channels
    }

    /// Intensity sample of a 1-channel image at (x, y). Debug-asserts bounds;
    /// all interior loops in the engine iterate within validated geometry.
    #[inline]
    pub fn intensity(&self, x: usize, y: usize) -> u8 {
        debug_assert!(self.channels == 1 && x < self.width && y < self.height);
        self.data[y * self.bytes_per_line + x]
    }

    #[inline]
    pub fn set_intensity(&mut self, x: usize, y: usize, value: u8) {
        debug_assert!(self.channels == 1 && x < self.width && y < self.height);
        self.data[y * self.bytes_per_line + x] = value;
    }

    /// BGR triple of a 3-channel image at (x, y).
    #[inline]
    pub fn bgr(&self, x: usize, y: usize) -> (u8, u8, u8) {
        debug_assert!(self.channels == 3 && x < self.width && y < self.height);
        let i = self.offset(x, y);
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// True when `other` shares this image's width and height.
    pub fn same_dimensions(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Validates that this image has exactly `channels` channels.
    pub fn require_channels(&self, channels: usize) -> Result<(), VisionError> {
        if self.channels != channels {
            return Err(VisionError::ChannelMismatch {
                expected: channels,
                actual: self.channels,
            });
        }
        Ok(())
    }

    /// Validates that `self` and `other` share width and height.
    pub fn require_same_dimensions(&self, other: &Image) -> Result<(), VisionError> {
        if !self.same_dimensions(other) {
            return Err(VisionError::DimensionMismatch {
                src_width: self.width,
                src_height: self.height,
                dst_width: other.width,
                dst_height: other.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_zeroed_and_sized() {
        let img = Image::new(7, 3, 3, LEVELS_8BIT).unwrap();
        assert_eq!(img.data().len(), 7 * 3 * 3);
        assert!(img.data().iter().all(|&v| v == 0));
        assert_eq!(img.bytes_per_line(), 21);
    }

    #[test]
    fn allocate_then_drop_twice_is_safe() {
        // Release is Drop; cloning and dropping both owners exercises the
        // double-release property without any unsafe escape hatch.
        let img = Image::new(4, 4, 1, LEVELS_8BIT).unwrap();
        let copy = img.clone();
        drop(img);
        drop(copy);
    }

    #[test]
    fn rejects_degenerate_geometry() {
        assert!(Image::new(0, 5, 1, LEVELS_8BIT).is_err());
        assert!(Image::new(5, 0, 1, LEVELS_8BIT).is_err());
        assert!(Image::new(5, 5, 2, LEVELS_8BIT).is_err());
    }

    #[test]
    fn from_bgr_buffer_honors_padded_stride() {
        // 2x2 frame, 8-byte stride (2 padding bytes per row).
        let mut raw = vec![0u8; 8 + 6];
        raw[0..6].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        raw[8..14].copy_from_slice(&[7, 8, 9, 10, 11, 12]);

        let img = Image::from_bgr_buffer(2, 2, 8, &raw).unwrap();
        assert_eq!(img.bgr(0, 0), (1, 2, 3));
        assert_eq!(img.bgr(1, 0), (4, 5, 6));
        assert_eq!(img.bgr(0, 1), (7, 8, 9));
        assert_eq!(img.bgr(1, 1), (10, 11, 12));
    }

    #[test]
    fn from_bgr_buffer_rejects_short_buffer() {
        let raw = vec![0u8; 10];
        assert!(matches!(
            Image::from_bgr_buffer(2, 2, 6, &raw),
            Err(VisionError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn from_bgr_buffer_rejects_undersized_stride() {
        let raw = vec![0u8; 64];
        assert!(matches!(
            Image::from_bgr_buffer(4, 2, 10, &raw),
            Err(VisionError::BadStride { .. })
        ));
    }
}
