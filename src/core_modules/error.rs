// THEORY:
// Every fallible operation in the engine communicates failure through its
// return value; there are no panics on bad input anywhere in the library.
// The error taxonomy is deliberately small: almost everything that can go
// wrong at this layer is a caller handing two buffers whose geometry does
// not line up, or asking for a structuring element the morphology engine
// cannot honor. All failures are local and recoverable — the frame loop
// that drives the pipeline is expected to skip the offending frame, never
// to abort.

use thiserror::Error;

/// Unified error type for all image-level operations in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisionError {
    /// An image was requested or supplied with unusable dimensions.
    #[error("invalid image geometry: {width}x{height}, {channels} channel(s)")]
    BadGeometry {
        width: usize,
        height: usize,
        channels: usize,
    },

    /// Two images that must share width/height do not.
    #[error("dimension mismatch: {src_width}x{src_height} vs {dst_width}x{dst_height}")]
    DimensionMismatch {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },

    /// An operation received an image with the wrong channel count.
    #[error("channel mismatch: expected {expected} channel(s), got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    /// A raw frame buffer was shorter than its declared geometry requires.
    #[error("buffer size mismatch: expected at least {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Row stride smaller than width * channels.
    #[error("invalid row stride: {stride} for row width {row_bytes}")]
    BadStride { stride: usize, row_bytes: usize },

    /// Structuring element side that is even, zero, or otherwise unusable.
    #[error("invalid kernel size {size} (must be odd and >= {min})")]
    BadKernel { size: usize, min: usize },
}
