use samples::{Position, Timestamp};

/// Fewest frames between two consecutive samples
pub const MIN_STEPS: usize = 5;
/// Most frames between two consecutive samples
pub const MAX_STEPS: usize = 50;
const DIST_TIME_PER_STEP: f64 = 1000.0;

/// How many interpolated frames separate two consecutive samples. Distance is measured in raw
/// degrees and time in seconds; the product scales the frame count, bounded to
/// `[MIN_STEPS, MAX_STEPS]`.
///
/// Samples out of time order give a negative product, which clamps to `MIN_STEPS`. Callers
/// should sort first; `samples::Track` does.
pub fn estimate_steps(p1: Position, p2: Position, t1: Timestamp, t2: Timestamp) -> usize {
    let dist = (p2.lon - p1.lon).hypot(p2.lat - p1.lat);
    let dt = t2 - t1;
    let raw = (dist * dt / DIST_TIME_PER_STEP).floor();
    if raw.is_nan() {
        return MIN_STEPS;
    }
    raw.clamp(MIN_STEPS as f64, MAX_STEPS as f64) as usize
}
