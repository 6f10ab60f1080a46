// THEORY:
// A `Blob` is the spatial unit of the engine: one maximal 4-connected region
// of foreground pixels, summarized by its derived geometry. It is produced
// fresh by the labeler for every frame and carries no memory of previous
// frames — object permanence is the tracker's job, not the blob's.
//
// Much like the raw pixel structures below it, `Blob` is a "dumb" data
// container: all the intelligence lives in the modules that produce and
// consume it (the labeler, the filters, the tracker).

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One connected foreground region and its aggregated geometry.
///
/// Invariants established by the labeler: `area > 0`, the bounding box is the
/// tight enclosure of all member pixels, and the centroid lies within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Label assigned during this frame's labelling pass. Unique within the
    /// frame, 1-based, not stable across frames.
    pub label: u32,
    /// Top-left corner of the bounding box.
    pub x: usize,
    pub y: usize,
    /// Bounding box dimensions in pixels.
    pub width: usize,
    pub height: usize,
    /// Number of member pixels.
    pub area: usize,
    /// Integer-truncated mean of member pixel coordinates.
    pub centroid: Point,
}

impl Blob {
    /// Bounding-box perimeter approximation, `2 * (width + height)`, used by
    /// the shape filter when no traced contour is available.
    pub fn perimeter(&self) -> usize {
        2 * (self.width + self.height)
    }

    /// Aspect ratio normalized to (0, 1]: the shorter side over the longer.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }
        let ratio = self.width as f64 / self.height as f64;
        if ratio > 1.0 { 1.0 / ratio } else { ratio }
    }

    /// Circularity estimate `4 * pi * area / perimeter^2`; 1.0 for an ideal
    /// disc, lower for elongated or ragged regions.
    pub fn circularity(&self) -> f64 {
        let perimeter = self.perimeter();
        if perimeter == 0 {
            return 0.0;
        }
        4.0 * std::f64::consts::PI * self.area as f64 / (perimeter * perimeter) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_blob(side: usize) -> Blob {
        Blob {
            label: 1,
            x: 0,
            y: 0,
            width: side,
            height: side,
            area: side * side,
            centroid: Point {
                x: side / 2,
                y: side / 2,
            },
        }
    }

    #[test]
    fn aspect_ratio_is_normalized() {
        let mut blob = square_blob(10);
        blob.width = 20;
        assert!((blob.aspect_ratio() - 0.5).abs() < 1e-9);
        blob.width = 5;
        assert!((blob.aspect_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn circularity_of_a_square_is_pi_over_four() {
        // area = s^2, perimeter = 4s: 4*pi*s^2 / 16 s^2 = pi/4.
        let blob = square_blob(8);
        assert!((blob.circularity() - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point { x: 0, y: 0 };
        let b = Point { x: 3, y: 4 };
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
