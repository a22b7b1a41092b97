#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod columns;
mod ids;
mod load;
mod time;

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use columns::ColumnConfig;
pub use ids::TrackID;
pub use load::{load, LoadReport};
pub use time::Timestamp;

/// A WGS84 position in degrees. Reprojection happens before anything reaches this crate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub pos: Position,
    pub time: Timestamp,
}

impl Sample {
    pub fn new(lon: f64, lat: f64, time: Timestamp) -> Self {
        Self {
            pos: Position::new(lon, lat),
            time,
        }
    }
}

/// One moving entity's position history, sorted by time. Deserializing goes through
/// `Track::new`, so the same invariants hold.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawTrack")]
pub struct Track {
    pub id: TrackID,
    samples: Vec<Sample>,
    /// The input listed this track's samples out of time order
    pub was_reordered: bool,
}

impl Track {
    /// Sorts the samples by time. Samples with equal times keep their input order.
    pub fn new(id: TrackID, mut samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            bail!("Track {} has no samples", id);
        }
        let was_reordered = samples.windows(2).any(|pair| pair[0].time > pair[1].time);
        if was_reordered {
            samples.sort_by(|a, b| a.time.cmp_total(&b.time));
        }
        Ok(Self {
            id,
            samples,
            was_reordered,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first(&self) -> Sample {
        self.samples[0]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Consecutive (earlier, later) pairs
    pub fn pairs(&self) -> impl Iterator<Item = (Sample, Sample)> + '_ {
        self.samples.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[derive(Deserialize)]
struct RawTrack {
    id: TrackID,
    samples: Vec<Sample>,
}

impl TryFrom<RawTrack> for Track {
    type Error = anyhow::Error;

    fn try_from(raw: RawTrack) -> Result<Self> {
        Track::new(raw.id, raw.samples)
    }
}

/// Accumulates samples per track before they're sorted into `Track`s.
#[derive(Default)]
pub struct SampleStore {
    raw: BTreeMap<TrackID, Vec<Sample>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: TrackID, sample: Sample) -> Result<()> {
        if !sample.pos.is_valid() {
            bail!(
                "Sample for track {} is outside WGS84 bounds: {:?}",
                id,
                sample.pos
            );
        }
        if !sample.time.is_finite() {
            bail!("Sample for track {} has a non-finite time", id);
        }
        self.raw.entry(id).or_insert_with(Vec::new).push(sample);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn num_samples(&self) -> usize {
        self.raw.values().map(|list| list.len()).sum()
    }

    /// Tracks keyed (and so enumerated) by identifier
    pub fn into_tracks(self) -> Result<BTreeMap<TrackID, Track>> {
        let mut tracks = BTreeMap::new();
        for (id, samples) in self.raw {
            let track = Track::new(id.clone(), samples)?;
            if track.was_reordered {
                warn!(
                    "Track {} had samples out of time order; they've been sorted",
                    track.id
                );
            }
            tracks.insert(id, track);
        }
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn t(secs: f64) -> Timestamp {
        Timestamp::from_seconds(secs)
    }

    #[test]
    fn track_sorts_out_of_order_samples() {
        let track = Track::new(
            TrackID::from("bus"),
            vec![
                Sample::new(2.0, 0.0, t(20.0)),
                Sample::new(0.0, 0.0, t(0.0)),
                Sample::new(1.0, 0.0, t(10.0)),
            ],
        )
        .unwrap();
        assert!(track.was_reordered);
        let lons: Vec<f64> = track.samples().iter().map(|s| s.pos.lon).collect();
        assert_eq!(lons, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn sorted_track_is_not_flagged() {
        let track = Track::new(
            TrackID::from("bus"),
            vec![Sample::new(0.0, 0.0, t(0.0)), Sample::new(1.0, 0.0, t(0.0))],
        )
        .unwrap();
        assert!(!track.was_reordered);
        assert_eq!(track.pairs().count(), 1);
    }

    #[test]
    fn empty_track_is_rejected() {
        assert!(Track::new(TrackID::from("x"), Vec::new()).is_err());
    }

    #[test]
    fn store_rejects_out_of_range() {
        let mut store = SampleStore::new();
        assert!(store
            .push(TrackID::implicit(), Sample::new(181.0, 0.0, t(0.0)))
            .is_err());
        assert!(store
            .push(TrackID::implicit(), Sample::new(0.0, -90.5, t(0.0)))
            .is_err());
        assert!(store
            .push(TrackID::implicit(), Sample::new(f64::NAN, 0.0, t(0.0)))
            .is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn store_groups_by_id() {
        let mut store = SampleStore::new();
        store
            .push(TrackID::from("b"), Sample::new(0.0, 0.0, t(0.0)))
            .unwrap();
        store
            .push(TrackID::from("a"), Sample::new(1.0, 1.0, t(5.0)))
            .unwrap();
        store
            .push(TrackID::from("b"), Sample::new(2.0, 2.0, t(3.0)))
            .unwrap();
        assert_eq!(store.num_samples(), 3);

        let tracks = store.into_tracks().unwrap();
        let ids: Vec<&str> = tracks.keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(tracks[&TrackID::from("b")].len(), 2);
    }

    #[test]
    fn deserializing_upholds_track_invariants() {
        let empty = r#"{ "id": "ghost", "samples": [] }"#;
        assert!(serde_json::from_str::<Track>(empty).is_err());

        let shuffled = r#"{
            "id": "bus",
            "samples": [
                { "pos": { "lon": 1.0, "lat": 0.0 }, "time": 10.0 },
                { "pos": { "lon": 0.0, "lat": 0.0 }, "time": 0.0 }
            ]
        }"#;
        let track: Track = serde_json::from_str(shuffled).unwrap();
        assert!(track.was_reordered);
        assert_eq!(track.first().pos, Position::new(0.0, 0.0));
    }

    proptest! {
        #[test]
        fn new_track_is_time_sorted(times in prop::collection::vec(-1e9..1e9f64, 1..40)) {
            let samples: Vec<Sample> = times
                .iter()
                .enumerate()
                .map(|(idx, secs)| Sample::new(idx as f64 / 100.0, 0.0, t(*secs)))
                .collect();
            let input_sorted = times.windows(2).all(|pair| pair[0] <= pair[1]);

            let track = Track::new(TrackID::from("p"), samples).unwrap();
            prop_assert_eq!(track.len(), times.len());
            prop_assert_eq!(track.was_reordered, !input_sorted);
            prop_assert!(track.pairs().all(|(a, b)| a.time <= b.time));
        }
    }
}
