// THEORY:
// The labeler is the engine of the spatial grouping layer: it turns the flat
// binary foreground map into a list of discrete `Blob`s. The algorithm is a
// classic two-pass connected-component labelling with 4-connectivity realized
// through the left and top neighbors only, which is exactly the adjacency a
// single left-to-right, top-to-bottom raster scan can observe.
//
// Key algorithmic steps:
// 1.  **First Pass (label assignment)**: scan in raster order, skipping
//     background. A foreground pixel copies the label of its left or top
//     neighbor; with no labelled neighbor it opens a fresh label. When left
//     and top disagree, the two provisional labels describe one region: the
//     smaller label wins and every already-scanned pixel carrying the larger
//     one is rewritten immediately.
// 2.  **Eager Merge**: that rewrite is O(pixels scanned so far) per conflict
//     instead of the usual union-find bookkeeping. It is a deliberate
//     simplicity trade-off, acceptable at the frame sizes this engine
//     targets; the final labelling is identical to what union-find with
//     path compression would produce.
// 3.  **Second Pass (aggregation)**: accumulate per surviving label the pixel
//     area, coordinate sums and the tight bounding box, then derive the
//     integer-truncated centroid. Labels fully absorbed by merging have zero
//     area and are omitted, so the reported blob count is the count of
//     distinct labels actually present in the map.
//
// The labeler is a stateless utility: one binary frame in, one labelling out.

use crate::core_modules::binary::BACKGROUND;
use crate::core_modules::blob::{Blob, Point};
use crate::core_modules::error::VisionError;
use crate::core_modules::image::Image;

/// The result of labelling one binary frame: the per-pixel label map
/// (0 = background) and one `Blob` per connected foreground component.
#[derive(Debug, Clone)]
pub struct Labeling {
    pub width: usize,
    pub height: usize,
    /// Row-major label per pixel; 0 means background.
    pub label_map: Vec<u32>,
    /// One entry per distinct final label, ascending label order.
    pub blobs: Vec<Blob>,
}

impl Labeling {
    #[inline]
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        self.label_map[y * self.width + x]
    }
}

/// Per-label accumulator for the second pass.
#[derive(Debug, Clone)]
struct LabelAccumulator {
    area: usize,
    sum_x: usize,
    sum_y: usize,
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl LabelAccumulator {
    fn new() -> Self {
        Self {
            area: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: usize::MAX,
            min_y: usize::MAX,
            max_x: 0,
            max_y: 0,
        }
    }

    fn add(&mut self, x: usize, y: usize) {
        self.area += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Labels every 4-connected foreground component of a binary image.
pub fn label(binary: &Image) -> Result<Labeling, VisionError> {
    binary.require_channels(1)?;
    let width = binary.width();
    let height = binary.height();
    let mut label_map = vec![0u32; width * height];
    let mut next_label: u32 = 1;

    // First pass: provisional labels with eager merging.
    for y in 0..height {
        for x in 0..width {
            if binary.intensity(x, y) == BACKGROUND {
                continue;
            }
            let index = y * width + x;
            let left = if x > 0 { label_map[index - 1] } else { 0 };
            let top = if y > 0 { label_map[index - width] } else { 0 };

            let assigned = match (left, top) {
                (0, 0) => {
                    let fresh = next_label;
                    next_label += 1;
                    fresh
                }
                (l, 0) => l,
                (0, t) => t,
                (l, t) if l == t => l,
                (l, t) => {
                    let keep = l.min(t);
                    let fold = l.max(t);
                    // Rewrite everything scanned so far that carries the
                    // larger provisional label.
                    for cell in label_map[..index].iter_mut() {
                        if *cell == fold {
                            *cell = keep;
                        }
                    }
                    keep
                }
            };
            label_map[index] = assigned;
        }
    }

    // Second pass: aggregate geometry per surviving label.
    let mut accumulators = vec![LabelAccumulator::new(); next_label as usize];
    for y in 0..height {
        for x in 0..width {
            let lbl = label_map[y * width + x];
            if lbl != 0 {
                accumulators[lbl as usize].add(x, y);
            }
        }
    }

    // Finalize: labels with zero area were merged away and are not reported.
    let mut blobs = Vec::new();
    for (lbl, acc) in accumulators.iter().enumerate().skip(1) {
        if acc.area == 0 {
            continue;
        }
        blobs.push(Blob {
            label: lbl as u32,
            x: acc.min_x,
            y: acc.min_y,
            width: acc.max_x - acc.min_x + 1,
            height: acc.max_y - acc.min_y + 1,
            area: acc.area,
            centroid: Point {
                x: acc.sum_x / acc.area,
                y: acc.sum_y / acc.area,
            },
        });
    }

    Ok(Labeling {
        width,
        height,
        label_map,
        blobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::binary::FOREGROUND;
    use crate::core_modules::image::LEVELS_8BIT;

    fn binary_from_rows(rows: &[&str]) -> Image {
        let height = rows.len();
        let width = rows[0].len();
        let mut img = Image::new(width, height, 1, LEVELS_8BIT).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    img.set_intensity(x, y, FOREGROUND);
                }
            }
        }
        img
    }

    #[test]
    fn two_disjoint_squares_yield_two_blobs() {
        let img = binary_from_rows(&[
            "###..###",
            "###..###",
            "###..###",
        ]);
        let labeling = label(&img).unwrap();
        assert_eq!(labeling.blobs.len(), 2);

        let left = &labeling.blobs[0];
        assert_eq!(left.area, 9);
        assert_eq!((left.x, left.y, left.width, left.height), (0, 0, 3, 3));
        assert_eq!(left.centroid, Point { x: 1, y: 1 });

        let right = &labeling.blobs[1];
        assert_eq!(right.area, 9);
        assert_eq!(right.centroid, Point { x: 6, y: 1 });
    }

    #[test]
    fn corner_touching_staircase_stays_split() {
        // The two runs only touch diagonally; left/top adjacency must not
        // join them.
        let img = binary_from_rows(&[
            "##..",
            "..##",
        ]);
        let labeling = label(&img).unwrap();
        assert_eq!(labeling.blobs.len(), 2);
    }

    #[test]
    fn u_shape_merges_into_one_label() {
        // The two vertical arms get distinct provisional labels; the bottom
        // row joins them and must trigger the eager merge.
        let img = binary_from_rows(&[
            "#.#",
            "#.#",
            "###",
        ]);
        let labeling = label(&img).unwrap();
        assert_eq!(labeling.blobs.len(), 1);

        let blob = &labeling.blobs[0];
        assert_eq!(blob.area, 7);
        assert_eq!((blob.x, blob.y, blob.width, blob.height), (0, 0, 3, 3));
        // Every foreground pixel carries the same (smaller) final label.
        let expected = blob.label;
        for y in 0..3 {
            for x in 0..3 {
                if img.intensity(x, y) == FOREGROUND {
                    assert_eq!(labeling.label_at(x, y), expected);
                }
            }
        }
    }

    #[test]
    fn merged_away_labels_are_not_reported() {
        // A comb shape forces several provisional labels that all collapse.
        let img = binary_from_rows(&[
            "#.#.#",
            "#####",
        ]);
        let labeling = label(&img).unwrap();
        assert_eq!(labeling.blobs.len(), 1);
        assert_eq!(labeling.blobs[0].area, 8);
    }

    #[test]
    fn centroid_lies_within_the_bounding_box() {
        let img = binary_from_rows(&[
            ".###.",
            "#####",
            ".###.",
        ]);
        let labeling = label(&img).unwrap();
        for blob in &labeling.blobs {
            assert!(blob.centroid.x >= blob.x && blob.centroid.x < blob.x + blob.width);
            assert!(blob.centroid.y >= blob.y && blob.centroid.y < blob.y + blob.height);
        }
    }

    #[test]
    fn empty_frame_yields_no_blobs() {
        let img = Image::new(8, 8, 1, LEVELS_8BIT).unwrap();
        let labeling = label(&img).unwrap();
        assert!(labeling.blobs.is_empty());
        assert!(labeling.label_map.iter().all(|&l| l == 0));
    }
}
