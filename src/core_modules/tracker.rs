// THEORY:
// The tracker adds "object permanence" to the engine. Blobs are per-frame
// snapshots with no identity; the tracker associates them across frames so
// every physical coin is represented by exactly one persistent identity and
// is counted exactly once when it crosses the tally line.
//
// Key architectural principles:
// 1.  **Nearest-Centroid Association**: each accepted blob claims the nearest
//     tracked identity within a fixed distance ceiling. The assignment is
//     greedy in processing order — an identity claimed earlier in the frame
//     is no longer eligible for later blobs, so two near-simultaneous coins
//     cannot collapse onto one identity (first processed wins).
// 2.  **Gated Birth**: an unmatched blob becomes a new identity only when its
//     centroid lies on the designated entry side of the counting line.
//     Anything appearing on the exit side is noise or a re-detection of an
//     already-counted coin and never enters tracking.
// 3.  **Count-Once Crossing**: an identity's `counted` flag transitions from
//     false to true at the moment its centroid moves from one side of the
//     line to the other, and never reverts. The crossing event carries the
//     blob geometry of that frame so classification can use the crossing
//     frame's area.
// 4.  **Optional Staleness Eviction**: identities unmatched for more than a
//     configurable number of frames can be dropped to bound table growth.
//     Disabled by default, matching the observed behavior of the system this
//     engine replaces.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core_modules::blob::{Blob, Point};

/// Which side of the horizontal counting line a point lies on. A point with
/// `y > line_y` is `Below`; everything else (the line itself included) is
/// `Above`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSide {
    Above,
    Below,
}

/// One persistent identity in the tracker's table.
#[derive(Debug, Clone)]
pub struct TrackedCoin {
    /// Monotonically assigned, never reused.
    pub id: u64,
    /// Centroid observed in the most recent matching frame.
    pub last_centroid: Point,
    /// True once the identity has produced its single crossing event.
    pub counted: bool,
    /// Consecutive frames without a matching blob.
    pub missed_frames: u32,
}

/// Emitted when a tracked identity crosses the counting line, at most once
/// per identity. Carries the crossing frame's blob geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    pub identity: u64,
    pub area: usize,
    pub centroid: Point,
}

/// Frame-to-frame identity tracker with line-crossing detection.
pub struct CoinTracker {
    tracks: Vec<TrackedCoin>,
    next_id: u64,
    line_y: usize,
    max_distance: f64,
    entry_side: LineSide,
    max_missed_frames: Option<u32>,
}

impl CoinTracker {
    pub fn new(
        line_y: usize,
        max_distance: f64,
        entry_side: LineSide,
        max_missed_frames: Option<u32>,
    ) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 0,
            line_y,
            max_distance,
            entry_side,
            max_missed_frames,
        }
    }

    fn side_of(&self, point: &Point) -> LineSide {
        if point.y > self.line_y {
            LineSide::Below
        } else {
            LineSide::Above
        }
    }

    /// Processes one frame's accepted blobs in order and returns the crossing
    /// events fired this frame.
    pub fn process_frame(&mut self, blobs: &[Blob]) -> Vec<Crossing> {
        let mut crossings = Vec::new();
        // Only pre-existing tracks participate in matching; identities born
        // this frame are appended after the scan.
        let mut claimed = vec![false; self.tracks.len()];
        let mut born: Vec<TrackedCoin> = Vec::new();

        for blob in blobs {
            let mut best: Option<(usize, f64)> = None;
            for (i, track) in self.tracks.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                let distance = blob.centroid.distance(&track.last_centroid);
                if distance <= self.max_distance
                    && best.is_none_or(|(_, best_distance)| distance < best_distance)
                {
                    best = Some((i, distance));
                }
            }

            match best {
                Some((i, distance)) => {
                    claimed[i] = true;
                    let previous = self.tracks[i].last_centroid;
                    let crossed = self.side_of(&previous) != self.side_of(&blob.centroid);

                    let track = &mut self.tracks[i];
                    track.last_centroid = blob.centroid;
                    track.missed_frames = 0;
                    debug!(id = track.id, distance, "identity matched");

                    if crossed && !track.counted {
                        track.counted = true;
                        info!(id = track.id, area = blob.area, "counting-line crossing");
                        crossings.push(Crossing {
                            identity: track.id,
                            area: blob.area,
                            centroid: blob.centroid,
                        });
                    }
                }
                None => {
                    if self.side_of(&blob.centroid) == self.entry_side {
                        let id = self.next_id;
                        self.next_id += 1;
                        debug!(
                            id,
                            x = blob.centroid.x,
                            y = blob.centroid.y,
                            "identity created"
                        );
                        born.push(TrackedCoin {
                            id,
                            last_centroid: blob.centroid,
                            counted: false,
                            missed_frames: 0,
                        });
                    }
                    // Off-side orphan blobs are ignored for tracking purposes.
                }
            }
        }

        // Staleness bookkeeping for tracks nobody claimed this frame.
        for (i, track) in self.tracks.iter_mut().enumerate() {
            if !claimed[i] {
                track.missed_frames += 1;
            }
        }
        if let Some(limit) = self.max_missed_frames {
            self.tracks.retain(|track| {
                let keep = track.missed_frames <= limit;
                if !keep {
                    debug!(id = track.id, "stale identity evicted");
                }
                keep
            });
        }
        self.tracks.append(&mut born);

        crossings
    }

    pub fn tracks(&self) -> &[TrackedCoin] {
        &self.tracks
    }

    pub fn line_y(&self) -> usize {
        self.line_y
    }
}
