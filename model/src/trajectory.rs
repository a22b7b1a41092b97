use samples::{Position, Sample, Timestamp, Track};
use serde::{Deserialize, Serialize};

use crate::steps::estimate_steps;

/// One interpolated point on the animation timeline
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub pos: Position,
    pub time: Timestamp,
}

impl Frame {
    pub fn new(lon: f64, lat: f64, time: Timestamp) -> Self {
        Self {
            pos: Position::new(lon, lat),
            time,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.lon.is_finite() && self.pos.lat.is_finite() && self.time.is_finite()
    }
}

impl From<Sample> for Frame {
    fn from(sample: Sample) -> Self {
        Self {
            pos: sample.pos,
            time: sample.time,
        }
    }
}

/// Exactly `steps` frames from `p1` towards `p2`. Frame `i` sits at `i / steps` of the way,
/// applied independently to longitude, latitude and time. `p2` itself is never included; the
/// next pair starts there.
pub fn interpolate(
    p1: Position,
    p2: Position,
    t1: Timestamp,
    t2: Timestamp,
    steps: usize,
) -> Vec<Frame> {
    (0..steps)
        .map(|i| {
            let pct = i as f64 / steps as f64;
            Frame {
                pos: Position::new(
                    p1.lon + pct * (p2.lon - p1.lon),
                    p1.lat + pct * (p2.lat - p1.lat),
                ),
                time: t1.lerp(t2, pct),
            }
        })
        .collect()
}

/// The dense path for one track, concatenating every consecutive pair. The final sample is never
/// reached. A single-sample track has an empty path.
pub fn build_path(track: &Track) -> Vec<Frame> {
    let mut path = Vec::new();
    for (s1, s2) in track.pairs() {
        let steps = estimate_steps(s1.pos, s2.pos, s1.time, s2.time);
        path.extend(interpolate(s1.pos, s2.pos, s1.time, s2.time, steps));
    }
    path
}
