// THEORY:
// Historical versions of this system carried several near-identical pipelines
// that differed only in numeric thresholds tuned per input video. Those were
// design iterations, not distinct subsystems, so this engine implements one
// parameterized pipeline and pushes every per-video number into a
// `VideoProfile`: binarization threshold, morphology kernel sizes, shape and
// color cutoffs, counting-line placement, tracker association distance, the
// denomination area bands and the per-denomination monetary values.
//
// Profiles are plain serde-serializable data so they can live next to the
// footage as JSON instead of being compiled into the engine. Two built-in
// constructors reproduce the calibration tables of the two reference videos.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core_modules::classifier::ClassBand;
use crate::core_modules::tracker::LineSide;

/// Complete per-video configuration for the counting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoProfile {
    /// Identifier of the footage this calibration belongs to.
    pub name: String,

    // --- Segmentation ---
    /// Optional grayscale box-blur kernel applied before binarization.
    pub blur_kernel: Option<usize>,
    /// Binarization threshold (strict `>`).
    pub threshold: u8,
    /// Negate the binary image after thresholding. The reference footage has
    /// dark coins on a bright belt, so this defaults to true.
    pub invert: bool,
    /// Structuring element sides for the noise-removal opening and the
    /// hole-filling closing.
    pub open_kernel: usize,
    pub close_kernel: usize,

    // --- Region filtering ---
    /// Blobs below this pixel area are discarded before any other filter.
    pub min_area: usize,
    /// Minimum normalized aspect ratio (shorter side / longer side).
    pub min_aspect: f64,
    /// Minimum circularity from the bounding-box perimeter approximation.
    pub min_circularity: f64,
    /// HSV value below which a blob counts as "black" and is rejected.
    /// `None` disables the black band.
    pub black_value_cutoff: Option<f32>,

    // --- Tracking ---
    /// Y coordinate of the horizontal counting line.
    pub line_y: usize,
    /// Side of the line on which new identities may be created.
    pub entry_side: LineSide,
    /// Maximum centroid distance for frame-to-frame association.
    pub max_distance: f64,
    /// Evict identities unmatched for more than this many frames.
    /// `None` keeps identities forever.
    pub max_missed_frames: Option<u32>,

    // --- Classification ---
    /// Ordered half-open area bands mapping to denomination labels.
    pub bands: Vec<ClassBand>,
    /// Denomination label -> value in cents, for the running monetary total.
    pub coin_values: BTreeMap<String, u32>,
}

impl VideoProfile {
    /// Euro denomination values in cents, shared by the built-in profiles.
    fn euro_values() -> BTreeMap<String, u32> {
        [
            ("1c", 1),
            ("2c", 2),
            ("5c", 5),
            ("10c", 10),
            ("20c", 20),
            ("50c", 50),
            ("1e", 100),
            ("2e", 200),
        ]
        .into_iter()
        .map(|(label, cents)| (label.to_string(), cents))
        .collect()
    }

    /// Calibration for the first reference video.
    pub fn video1() -> Self {
        Self {
            name: "video1".to_string(),
            blur_kernel: None,
            threshold: 120,
            invert: true,
            open_kernel: 3,
            close_kernel: 3,
            min_area: 2000,
            min_aspect: 0.6,
            min_circularity: 0.5,
            black_value_cutoff: Some(0.12),
            line_y: 300,
            entry_side: LineSide::Below,
            max_distance: 50.0,
            max_missed_frames: None,
            bands: vec![
                ClassBand::new(2000, 2900, "1c"),
                ClassBand::new(2900, 3000, "2c"),
                ClassBand::new(3000, 4000, "5c"),
                ClassBand::new(4000, 6000, "10c"),
                ClassBand::new(6000, 9000, "20c"),
                ClassBand::new(11500, 13000, "50c"),
                ClassBand::new(9000, 16000, "1e"),
                ClassBand::new(16000, 17000, "2e"),
            ],
            coin_values: Self::euro_values(),
        }
    }

    /// Calibration for the second reference video.
    pub fn video2() -> Self {
        Self {
            name: "video2".to_string(),
            blur_kernel: None,
            threshold: 120,
            invert: true,
            open_kernel: 3,
            close_kernel: 3,
            min_area: 2000,
            min_aspect: 0.6,
            min_circularity: 0.5,
            black_value_cutoff: Some(0.18),
            line_y: 300,
            entry_side: LineSide::Below,
            max_distance: 50.0,
            max_missed_frames: None,
            bands: vec![
                ClassBand::new(2000, 2600, "1c"),
                ClassBand::new(2600, 2900, "2c"),
                ClassBand::new(2900, 3721, "5c"),
                ClassBand::new(3721, 4500, "10c"),
                ClassBand::new(4500, 7800, "20c"),
                ClassBand::new(7800, 7930, "50c"),
                ClassBand::new(7930, 12000, "1e"),
                ClassBand::new(12000, 15000, "2e"),
            ],
            coin_values: Self::euro_values(),
        }
    }

    /// Looks up a built-in profile by video identifier.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "video1" | "video1.mp4" => Some(Self::video1()),
            "video2" | "video2.mp4" => Some(Self::video2()),
            _ => None,
        }
    }

    /// Parses a profile from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Value of a denomination in cents; unrecognized labels are worth 0.
    pub fn value_of(&self, label: &str) -> u32 {
        self.coin_values.get(label).copied().unwrap_or(0)
    }
}
