// THEORY:
// This file is the main entry point for the `coin_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (the frame
// acquisition / reporting orchestrator).
//
// The primary goal is to export the `CoinPipeline` and its associated data
// structures (`PipelineConfig`, `FrameReport`, `VideoProfile`, ...) as the
// clean, high-level interface for the entire counting engine. The algorithmic
// internals (`core_modules`) stay public for advanced consumers that want to
// drive individual stages — grayscale conversion, morphology, labelling —
// directly, but everyday users only need the pipeline surface re-exported
// below.

pub mod core_modules;
pub mod pipeline;
pub mod profile;

pub use crate::core_modules::blob::{Blob, Point};
pub use crate::core_modules::classifier::{ClassBand, UNRECOGNIZED, classify};
pub use crate::core_modules::error::VisionError;
pub use crate::core_modules::image::{Image, LEVELS_8BIT};
pub use crate::core_modules::tracker::{CoinTracker, Crossing, LineSide, TrackedCoin};
pub use crate::pipeline::{CoinEvent, CoinPipeline, CountSummary, FrameReport, PipelineConfig};
pub use crate::profile::VideoProfile;
