// THEORY:
// Classification maps a crossing coin's pixel area to a denomination label.
// Area is a surprisingly robust discriminator here because the camera height
// is fixed per video, so each denomination occupies a narrow, calibrated area
// band. The bands are external configuration (they differ per video), and the
// classifier itself is nothing more than an ordered first-match scan.
//
// Band boundaries are canonically half-open `[min, max)`. Areas that fall
// between bands or beyond the table yield the sentinel label rather than an
// error — an unclassifiable coin is an expected outcome, not a failure.

use serde::{Deserialize, Serialize};

/// Sentinel label for areas no band matches.
pub const UNRECOGNIZED: &str = "X";

/// One classification band: areas in `[min_area, max_area)` map to `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassBand {
    pub min_area: usize,
    pub max_area: usize,
    pub label: String,
}

impl ClassBand {
    pub fn new(min_area: usize, max_area: usize, label: &str) -> Self {
        Self {
            min_area,
            max_area,
            label: label.to_string(),
        }
    }
}

/// Returns the label of the first band containing `area`, or [`UNRECOGNIZED`]
/// when no band matches.
pub fn classify(area: usize, bands: &[ClassBand]) -> &str {
    bands
        .iter()
        .find(|band| area >= band.min_area && area < band.max_area)
        .map_or(UNRECOGNIZED, |band| band.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> Vec<ClassBand> {
        vec![
            ClassBand::new(2000, 2900, "1c"),
            ClassBand::new(2900, 3000, "2c"),
            ClassBand::new(3000, 4000, "5c"),
        ]
    }

    #[test]
    fn area_inside_a_band_maps_to_its_label() {
        assert_eq!(classify(2500, &bands()), "1c");
        assert_eq!(classify(3500, &bands()), "5c");
    }

    #[test]
    fn bands_are_half_open() {
        let bands = bands();
        assert_eq!(classify(2000, &bands), "1c");
        assert_eq!(classify(2899, &bands), "1c");
        assert_eq!(classify(2900, &bands), "2c");
        assert_eq!(classify(4000, &bands), UNRECOGNIZED);
    }

    #[test]
    fn unmatched_area_yields_sentinel() {
        assert_eq!(classify(1000, &bands()), UNRECOGNIZED);
        assert_eq!(classify(0, &[]), UNRECOGNIZED);
    }

    #[test]
    fn first_matching_band_wins_on_overlap() {
        let overlapping = vec![
            ClassBand::new(2000, 5000, "first"),
            ClassBand::new(3000, 4000, "second"),
        ];
        assert_eq!(classify(3500, &overlapping), "first");
    }
}
