use std::collections::BTreeMap;

use abstutil::Timer;
use samples::{Position, Track, TrackID};

use crate::render::Rgb;
use crate::trajectory::{build_path, Frame};

/// Track colors, assigned cyclically in identifier order
pub const PALETTE: [Rgb; 6] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 0, 255),
];

/// How per-track path lengths combine into the frame count driving progress and finish
/// detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregation {
    /// Every track plays at once; shorter tracks freeze on their last frame.
    MaxAcrossTracks,
}

pub const AGGREGATION: Aggregation = Aggregation::MaxAcrossTracks;

pub struct TrackPath {
    pub id: TrackID,
    pub color: Rgb,
    frames: Vec<Frame>,
    // Shown when the path is empty
    anchor: Frame,
}

impl TrackPath {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// A track with a single sample has no path. It never moves; it's held at that sample.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame displayed at a global cursor. Past the end of this path, the last frame holds.
    pub fn frame_at(&self, cursor: f64) -> Frame {
        if self.frames.is_empty() {
            return self.anchor;
        }
        let idx = cursor.max(0.0).floor() as usize;
        self.frames[idx.min(self.frames.len() - 1)]
    }

    /// The segments already traveled at a cursor, oldest first
    pub fn trail(&self, cursor: f64) -> impl Iterator<Item = (Frame, Frame)> + '_ {
        let end = (cursor.max(0.0).floor() as usize).min(self.frames.len());
        self.frames[..end]
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
    }
}

/// Every track's path, built once before playback and read-only afterwards.
pub struct Timeline {
    tracks: Vec<TrackPath>,
    aggregation: Aggregation,
}

impl Timeline {
    pub fn build(tracks: &BTreeMap<TrackID, Track>, timer: &mut Timer) -> Timeline {
        if !tracks.is_empty() {
            timer.start_iter("interpolate tracks", tracks.len());
        }
        let mut paths = Vec::new();
        for (idx, track) in tracks.values().enumerate() {
            timer.next();
            paths.push(TrackPath {
                id: track.id.clone(),
                color: PALETTE[idx % PALETTE.len()],
                frames: build_path(track),
                anchor: Frame::from(track.first()),
            });
        }

        let timeline = Timeline {
            tracks: paths,
            aggregation: AGGREGATION,
        };
        info!(
            "Timeline has {} tracks ({} static), {} frames total",
            timeline.tracks.len(),
            timeline.tracks.iter().filter(|t| t.is_empty()).count(),
            timeline.total_frames()
        );
        if let Some((min, max)) = timeline.bounds() {
            info!(
                "Tracks span lon {:.4} to {:.4}, lat {:.4} to {:.4}",
                min.lon, max.lon, min.lat, max.lat
            );
        }
        timeline
    }

    /// Builds from ready-made paths, coloring in the given order. An empty path has nothing to
    /// display and is skipped.
    pub fn from_paths(paths: Vec<(TrackID, Vec<Frame>)>) -> Timeline {
        let tracks = paths
            .into_iter()
            .filter(|(_, frames)| !frames.is_empty())
            .enumerate()
            .map(|(idx, (id, frames))| TrackPath {
                id,
                color: PALETTE[idx % PALETTE.len()],
                anchor: frames[0],
                frames,
            })
            .collect();
        Timeline {
            tracks,
            aggregation: AGGREGATION,
        }
    }

    pub fn tracks(&self) -> &[TrackPath] {
        &self.tracks
    }

    pub fn track(&self, id: &TrackID) -> Option<&TrackPath> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Frames in the whole animation, per the aggregation policy. May be 0.
    pub fn total_frames(&self) -> usize {
        match self.aggregation {
            Aggregation::MaxAcrossTracks => {
                self.tracks.iter().map(|t| t.len()).max().unwrap_or(0)
            }
        }
    }

    /// Each track's displayed frame at a cursor
    pub fn frames_at(&self, cursor: f64) -> impl Iterator<Item = (&TrackPath, Frame)> + '_ {
        self.tracks.iter().map(move |t| (t, t.frame_at(cursor)))
    }

    /// (min, max) corners of every frame and static track, or None if there are no tracks.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut result: Option<(Position, Position)> = None;
        for track in &self.tracks {
            let frames = if track.frames.is_empty() {
                std::slice::from_ref(&track.anchor)
            } else {
                &track.frames[..]
            };
            for frame in frames {
                let p = frame.pos;
                result = Some(match result {
                    Some((min, max)) => (
                        Position::new(min.lon.min(p.lon), min.lat.min(p.lat)),
                        Position::new(max.lon.max(p.lon), max.lat.max(p.lat)),
                    ),
                    None => (p, p),
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use samples::{Sample, Timestamp};

    use super::*;
    use crate::steps::estimate_steps;

    fn t(secs: f64) -> Timestamp {
        Timestamp::from_seconds(secs)
    }

    fn straight_path(len: usize) -> Vec<Frame> {
        (0..len)
            .map(|i| Frame::new(i as f64, 0.0, t(i as f64)))
            .collect()
    }

    fn tracks(raw: Vec<(&str, Vec<Sample>)>) -> BTreeMap<TrackID, Track> {
        raw.into_iter()
            .map(|(id, samples)| {
                let id = TrackID::from(id);
                (id.clone(), Track::new(id, samples).unwrap())
            })
            .collect()
    }

    #[test]
    fn shorter_tracks_freeze_on_their_last_frame() {
        let timeline = Timeline::from_paths(vec![
            (TrackID::from("short"), straight_path(10)),
            (TrackID::from("medium"), straight_path(20)),
            (TrackID::from("long"), straight_path(30)),
        ]);
        assert_eq!(timeline.aggregation(), Aggregation::MaxAcrossTracks);
        assert_eq!(timeline.total_frames(), 30);

        let shown: Vec<f64> = timeline.frames_at(25.0).map(|(_, f)| f.pos.lon).collect();
        assert_eq!(shown, vec![9.0, 19.0, 25.0]);
        // Fractional cursors round down
        assert_eq!(timeline.tracks()[2].frame_at(25.9).pos.lon, 25.0);
    }

    #[test]
    fn build_matches_step_estimates() {
        let input = tracks(vec![
            (
                "a",
                vec![
                    Sample::new(0.0, 0.0, t(0.0)),
                    Sample::new(10.0, 0.0, t(100.0)),
                    Sample::new(12.0, 1.0, t(130.0)),
                ],
            ),
            (
                "b",
                vec![Sample::new(5.0, 5.0, t(0.0)), Sample::new(5.0, 6.0, t(10.0))],
            ),
        ]);
        let timeline = Timeline::build(&input, &mut Timer::throwaway());
        for path in timeline.tracks() {
            let expected: usize = input[&path.id]
                .pairs()
                .map(|(s1, s2)| estimate_steps(s1.pos, s2.pos, s1.time, s2.time))
                .sum();
            assert_eq!(path.len(), expected);
        }
        assert_eq!(timeline.total_frames(), 55);
    }

    #[test]
    fn colors_cycle_in_id_order() {
        let raw: Vec<(String, Vec<Sample>)> = (0..8)
            .map(|i| (format!("v{i}"), vec![Sample::new(0.0, 0.0, t(0.0))]))
            .collect();
        let input = tracks(raw.iter().map(|(id, s)| (id.as_str(), s.clone())).collect());
        let timeline = Timeline::build(&input, &mut Timer::throwaway());
        let colors: Vec<Rgb> = timeline.tracks().iter().map(|t| t.color).collect();
        assert_eq!(colors[0], PALETTE[0]);
        assert_eq!(colors[5], PALETTE[5]);
        assert_eq!(colors[6], PALETTE[0]);
        assert_eq!(colors[7], PALETTE[1]);
        assert_eq!(timeline.tracks()[0].id, TrackID::from("v0"));
    }

    #[test]
    fn single_sample_track_is_static() {
        let input = tracks(vec![("lonely", vec![Sample::new(3.0, 4.0, t(7.0))])]);
        let timeline = Timeline::build(&input, &mut Timer::throwaway());
        assert_eq!(timeline.total_frames(), 0);
        let track = &timeline.tracks()[0];
        assert!(track.is_empty());
        assert_eq!(track.frame_at(12.0), Frame::new(3.0, 4.0, t(7.0)));
        assert_eq!(track.trail(12.0).count(), 0);
    }

    #[test]
    fn trail_stops_at_cursor() {
        let timeline = Timeline::from_paths(vec![(TrackID::from("a"), straight_path(10))]);
        let track = &timeline.tracks()[0];
        assert_eq!(track.trail(0.0).count(), 0);
        assert_eq!(track.trail(1.5).count(), 0);
        let segments: Vec<(f64, f64)> = track
            .trail(4.2)
            .map(|(a, b)| (a.pos.lon, b.pos.lon))
            .collect();
        assert_eq!(segments, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(track.trail(100.0).count(), 9);
    }

    #[test]
    fn bounds_cover_everything() {
        let input = tracks(vec![
            (
                "a",
                vec![Sample::new(-10.0, 0.0, t(0.0)), Sample::new(10.0, 5.0, t(100.0))],
            ),
            ("b", vec![Sample::new(20.0, -30.0, t(0.0))]),
        ]);
        let timeline = Timeline::build(&input, &mut Timer::throwaway());
        let (min, max) = timeline.bounds().unwrap();
        assert_eq!(min, Position::new(-10.0, -30.0));
        assert_eq!(max.lon, 20.0);
        // The final sample of "a" is never a frame
        assert!(max.lat < 5.0);

        assert!(Timeline::from_paths(Vec::new()).bounds().is_none());
    }
}
