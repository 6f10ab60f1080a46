// THEORY:
// The `pipeline` module is the final, top-level API for the entire counting
// engine. It encapsulates the full stack — grayscale conversion, smoothing,
// binarization, morphology, labelling, filtering, tracking and classification
// — into a single, easy-to-use interface: hand it raw BGR frames, receive
// per-frame reports and a running tally.
//
// Per frame the data flows strictly downward:
//
//   color frame -> gray -> (blur) -> threshold -> (negate)
//     -> open -> close -> label -> [per blob: area / color / shape filters]
//     -> tracker -> [per crossing: classifier -> accumulator]
//
// Every stage buffer is allocated at frame start and dropped before the next
// frame; the only state that survives a frame is the tracker's identity
// table and the running `CountSummary`, both owned by the pipeline value.
// There is no global state anywhere. Processing is single-threaded and
// synchronous: the surrounding frame loop decides whether another frame is
// processed at all.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::core_modules::binary;
use crate::core_modules::blob::{Blob, Point};
use crate::core_modules::classifier;
use crate::core_modules::error::VisionError;
use crate::core_modules::filter;
use crate::core_modules::grayscale;
use crate::core_modules::image::{Image, LEVELS_8BIT};
use crate::core_modules::labeling;
use crate::core_modules::morphology;
use crate::core_modules::tracker::CoinTracker;
use crate::core_modules::utils::image_helper;
use crate::profile::VideoProfile;

// Re-export key data structures for the public API.
pub use crate::core_modules::classifier::UNRECOGNIZED;
pub use crate::core_modules::tracker::{Crossing, LineSide, TrackedCoin};

/// Configuration for the `CoinPipeline`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub image_width: usize,
    pub image_height: usize,
    /// Per-video calibration: thresholds, kernels, line placement, bands.
    pub profile: VideoProfile,
    /// When set, every stage buffer is dumped to this directory as PNG,
    /// one file per frame and stage. Best effort; dump failures are logged
    /// and never fail the frame.
    pub debug_dump_dir: Option<PathBuf>,
}

/// A classified crossing: the unit a reporting collaborator consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinEvent {
    /// Persistent tracker identity that crossed the line.
    pub identity: u64,
    /// Denomination label, or [`UNRECOGNIZED`] when no band matched.
    pub label: String,
    /// Pixel area in the crossing frame.
    pub area: usize,
    pub centroid: Point,
}

/// Running aggregates over all processed frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountSummary {
    /// Total crossing events, recognized or not.
    pub total_crossings: u64,
    /// Crossings per recognized denomination label.
    pub counts: BTreeMap<String, u64>,
    /// Accumulated value of recognized crossings, in cents.
    pub total_value_cents: u64,
}

/// The primary output of the pipeline for a single frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Blobs that survived all rejection filters this frame.
    pub blobs: Vec<Blob>,
    /// Crossing events fired this frame, already classified.
    pub events: Vec<CoinEvent>,
    /// Snapshot of the running aggregates after this frame.
    pub summary: CountSummary,
}

/// The main, top-level struct for the counting engine.
pub struct CoinPipeline {
    config: PipelineConfig,
    tracker: CoinTracker,
    summary: CountSummary,
    frame_index: u64,
}

impl CoinPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let profile = &config.profile;
        let tracker = CoinTracker::new(
            profile.line_y,
            profile.max_distance,
            profile.entry_side,
            profile.max_missed_frames,
        );
        Self {
            config,
            tracker,
            summary: CountSummary::default(),
            frame_index: 0,
        }
    }

    /// Processes one tightly packed BGR frame (stride == width * 3).
    pub fn process_frame(&mut self, frame: &[u8]) -> Result<FrameReport, VisionError> {
        self.process_frame_with_stride(frame, self.config.image_width * 3)
    }

    /// Processes one BGR frame with an explicit row stride in bytes.
    pub fn process_frame_with_stride(
        &mut self,
        frame: &[u8],
        stride: usize,
    ) -> Result<FrameReport, VisionError> {
        let width = self.config.image_width;
        let height = self.config.image_height;
        let profile = self.config.profile.clone();
        self.frame_index += 1;

        // --- Stage 1: segmentation ---
        let color = Image::from_bgr_buffer(width, height, stride, frame)?;
        let mut gray = Image::new(width, height, 1, LEVELS_8BIT)?;
        grayscale::bgr_to_gray(&color, &mut gray)?;

        if let Some(kernel) = profile.blur_kernel {
            let mut blurred = Image::new(width, height, 1, LEVELS_8BIT)?;
            morphology::box_blur(&gray, &mut blurred, kernel)?;
            gray = blurred;
        }

        let mut bin = Image::new(width, height, 1, LEVELS_8BIT)?;
        binary::threshold(&gray, &mut bin, profile.threshold)?;
        if profile.invert {
            binary::negate(&mut bin)?;
        }

        // --- Stage 2: morphology ---
        let mut temp = Image::new(width, height, 1, LEVELS_8BIT)?;
        let mut opened = Image::new(width, height, 1, LEVELS_8BIT)?;
        morphology::open(&bin, &mut opened, profile.open_kernel, &mut temp)?;
        let mut cleaned = Image::new(width, height, 1, LEVELS_8BIT)?;
        morphology::close(&opened, &mut cleaned, profile.close_kernel, &mut temp)?;

        self.dump_stages(&gray, &bin, &cleaned);

        // --- Stage 3: spatial grouping ---
        let labeling = labeling::label(&cleaned)?;
        debug!(
            frame = self.frame_index,
            raw_blobs = labeling.blobs.len(),
            "labelling complete"
        );

        // --- Stage 4: rejection filters ---
        let mut accepted: Vec<Blob> = Vec::new();
        for blob in labeling.blobs {
            if blob.area < profile.min_area {
                debug!(
                    label = blob.label,
                    area = blob.area,
                    "blob below minimum area"
                );
                continue;
            }
            if filter::color_rejection(&color, &blob, profile.black_value_cutoff)?.is_some() {
                continue;
            }
            if !filter::passes_shape(&blob, profile.min_aspect, profile.min_circularity) {
                continue;
            }
            accepted.push(blob);
        }

        // --- Stage 5: tracking + classification ---
        let crossings = self.tracker.process_frame(&accepted);
        let mut events = Vec::with_capacity(crossings.len());
        for crossing in crossings {
            let label = classifier::classify(crossing.area, &profile.bands).to_string();
            self.summary.total_crossings += 1;
            if label != UNRECOGNIZED {
                *self.summary.counts.entry(label.clone()).or_default() += 1;
                self.summary.total_value_cents += u64::from(profile.value_of(&label));
            }
            events.push(CoinEvent {
                identity: crossing.identity,
                label,
                area: crossing.area,
                centroid: crossing.centroid,
            });
        }

        Ok(FrameReport {
            blobs: accepted,
            events,
            summary: self.summary.clone(),
        })
    }

    /// Best-effort PNG dump of the per-frame stage buffers.
    fn dump_stages(&self, gray: &Image, bin: &Image, cleaned: &Image) {
        let Some(dir) = &self.config.debug_dump_dir else {
            return;
        };
        for (stage, img) in [("gray", gray), ("binary", bin), ("morphology", cleaned)] {
            let path = dir.join(format!("frame{:05}_{stage}.png", self.frame_index));
            if let Err(error) = image_helper::save_gray(&path, img) {
                warn!(%error, stage, "debug dump failed");
            }
        }
    }

    /// Running aggregates over every frame processed so far.
    pub fn summary(&self) -> &CountSummary {
        &self.summary
    }

    /// The identities currently known to the tracker.
    pub fn tracked_coins(&self) -> &[TrackedCoin] {
        self.tracker.tracks()
    }
}
