use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::{ColumnConfig, Position, Sample, SampleStore, Timestamp, Track, TrackID};

/// What happened while reading the input
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub rows: usize,
    /// Rows with an empty or unparsable required field
    pub missing_fields: usize,
    /// Rows with coordinates outside WGS84 bounds
    pub out_of_range: usize,
    pub tracks: usize,
    /// Tracks whose samples weren't listed in time order
    pub reordered: Vec<TrackID>,
}

impl LoadReport {
    pub fn kept(&self) -> usize {
        self.rows - self.missing_fields - self.out_of_range
    }

    pub fn describe(&self) -> String {
        format!(
            "{} rows: {} kept, {} missing fields, {} out of range; {} tracks, {} reordered",
            self.rows,
            self.kept(),
            self.missing_fields,
            self.out_of_range,
            self.tracks,
            self.reordered.len()
        )
    }
}

/// Reads CSV rows into per-track, time-sorted samples. Bad rows (including fields that aren't
/// UTF-8) are skipped and counted, not fatal; a missing column or malformed CSV is.
pub fn load<R: std::io::Read>(
    reader: R,
    columns: &ColumnConfig,
) -> Result<(BTreeMap<TrackID, Track>, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().context("reading the CSV header")?.clone();
    let indices = columns.resolve(&headers)?;
    let time_format = columns.time_format.as_deref();

    let mut report = LoadReport::default();
    let mut store = SampleStore::new();
    for rec in reader.byte_records() {
        let rec = rec?;
        report.rows += 1;

        let field = |idx: usize| {
            rec.get(idx)
                .and_then(|raw| std::str::from_utf8(raw).ok())
                .map(str::trim)
                .filter(|x| !x.is_empty())
        };
        let (Some(raw_lon), Some(raw_lat), Some(raw_time)) =
            (field(indices.lon), field(indices.lat), field(indices.time))
        else {
            report.missing_fields += 1;
            continue;
        };
        let id = match indices.id {
            Some(idx) => match field(idx) {
                Some(id) => TrackID::from(id),
                None => {
                    report.missing_fields += 1;
                    continue;
                }
            },
            None => TrackID::implicit(),
        };

        let (Ok(lon), Ok(lat)) = (raw_lon.parse::<f64>(), raw_lat.parse::<f64>()) else {
            report.missing_fields += 1;
            continue;
        };
        let time = match Timestamp::parse(raw_time, time_format) {
            Ok(time) => time,
            Err(err) => {
                debug!("Skipping row {}: {}", report.rows, err);
                report.missing_fields += 1;
                continue;
            }
        };
        if !Position::new(lon, lat).is_valid() {
            report.out_of_range += 1;
            continue;
        }

        store.push(id, Sample::new(lon, lat, time))?;
    }

    let tracks = store.into_tracks()?;
    report.tracks = tracks.len();
    report.reordered = tracks
        .values()
        .filter(|track| track.was_reordered)
        .map(|track| track.id.clone())
        .collect();

    if report.kept() == 0 {
        warn!("No usable rows in the input");
    }
    info!("Loaded samples: {}", report.describe());
    Ok((tracks, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnConfig {
        ColumnConfig::new("lon", "lat", "time").with_id("vehicle")
    }

    #[test]
    fn load_groups_and_sorts() {
        let input = "\
vehicle,lon,lat,time
b,10.0,5.0,2023-01-01 00:01:00
a,1.0,2.0,2023-01-01 00:00:00
b,11.0,6.0,2023-01-01 00:00:00
a,1.5,2.5,2023-01-01 00:02:00
";
        let (tracks, report) = load(input.as_bytes(), &columns()).unwrap();
        assert_eq!(report.rows, 4);
        assert_eq!(report.kept(), 4);
        assert_eq!(report.tracks, 2);
        assert_eq!(report.reordered, vec![TrackID::from("b")]);

        let b = &tracks[&TrackID::from("b")];
        assert_eq!(b.samples()[0].pos, Position::new(11.0, 6.0));
        assert_eq!(b.samples()[1].pos, Position::new(10.0, 5.0));
        assert!(!tracks[&TrackID::from("a")].was_reordered);
    }

    #[test]
    fn load_drops_bad_rows() {
        let input = "\
vehicle,lon,lat,time
a,1.0,2.0,2023-01-01 00:00:00
a,,2.0,2023-01-01 00:00:10
a,1.0,2.0,
,1.0,2.0,2023-01-01 00:00:20
a,abc,2.0,2023-01-01 00:00:30
a,1.0,2.0,not a time
a,200.0,2.0,2023-01-01 00:00:40
a,1.0,-95.0,2023-01-01 00:00:50
a,1.1,2.1,2023-01-01 00:01:00
";
        let (tracks, report) = load(input.as_bytes(), &columns()).unwrap();
        assert_eq!(report.rows, 9);
        assert_eq!(report.missing_fields, 5);
        assert_eq!(report.out_of_range, 2);
        assert_eq!(report.kept(), 2);
        assert_eq!(tracks[&TrackID::from("a")].len(), 2);
    }

    #[test]
    fn load_without_id_column_uses_one_track() {
        let input = "\
x,y,when,vehicle
1,2,10,a
3,4,20,b
";
        let (tracks, report) =
            load(input.as_bytes(), &ColumnConfig::new("x", "y", "when")).unwrap();
        assert_eq!(report.tracks, 1);
        assert_eq!(tracks[&TrackID::implicit()].len(), 2);
    }

    #[test]
    fn load_with_explicit_time_format() {
        let input = "\
lon,lat,time
1,2,01/02/2023 10:00
1,2,01/02/2023 10:05
";
        let columns = ColumnConfig::new("lon", "lat", "time").with_time_format("%d/%m/%Y %H:%M");
        let (tracks, _) = load(input.as_bytes(), &columns).unwrap();
        let track = &tracks[&TrackID::implicit()];
        assert_eq!(track.samples()[1].time - track.samples()[0].time, 300.0);
    }

    #[test]
    fn load_empty_input() {
        let (tracks, report) = load("vehicle,lon,lat,time\n".as_bytes(), &columns()).unwrap();
        assert!(tracks.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn load_missing_column_is_fatal() {
        assert!(load("lon,lat\n1,2\n".as_bytes(), &columns()).is_err());
    }

    #[test]
    fn short_rows_count_as_missing() {
        let input = "\
vehicle,lon,lat,time
a,1.0,2.0
a,1.0,2.0,5
";
        let (_, report) = load(input.as_bytes(), &columns()).unwrap();
        assert_eq!(report.missing_fields, 1);
        assert_eq!(report.kept(), 1);
    }

    #[test]
    fn non_utf8_fields_count_as_missing() {
        let mut input = b"vehicle,lon,lat,time,note\na,\xff,2.0,5,ok\n".to_vec();
        input.extend_from_slice(b"a,1.0,2.0,6,\xfe\xfd\n");
        input.extend_from_slice(b"a,1.5,2.0,7,ok\n");
        let (tracks, report) = load(input.as_slice(), &columns()).unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.missing_fields, 1);
        // Unused columns aren't decoded
        assert_eq!(tracks[&TrackID::from("a")].len(), 2);
    }
}
