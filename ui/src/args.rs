use anyhow::{Context, Result};
use serde::Deserialize;
use structopt::StructOpt;

use model::PlaybackConfig;
use samples::ColumnConfig;

const DEFAULT_HEADLESS_FRAMES: usize = 600;

#[derive(StructOpt)]
pub struct Args {
    /// The path to a CSV file with one position sample per row
    #[structopt(long)]
    pub input: String,
    /// A JSON file with `columns` and `playback` sections. Other flags override its values.
    #[structopt(long)]
    config: Option<String>,
    /// The column holding longitude, in WGS84 degrees
    #[structopt(long)]
    lon: Option<String>,
    /// The column holding latitude, in WGS84 degrees
    #[structopt(long)]
    lat: Option<String>,
    /// The column holding each sample's timestamp
    #[structopt(long)]
    time: Option<String>,
    /// The column identifying tracks. If omitted, every row belongs to one track.
    #[structopt(long)]
    id: Option<String>,
    /// A chrono format for the time column, like "%d/%m/%Y %H:%M"
    #[structopt(long)]
    time_format: Option<String>,
    /// Frames advanced per tick, from 0.1 to 2.0
    #[structopt(long)]
    speed: Option<f64>,
    /// Start with trails hidden
    #[structopt(long)]
    no_trail: bool,
    /// An SVG map drawn under the tracks, stretched to the window. Without one, a plain ocean
    /// with a 30 degree grid is drawn.
    #[structopt(long)]
    pub background: Option<String>,
    /// Play without opening a window
    #[structopt(long)]
    pub headless: bool,
    /// With --headless, how many ticks to run
    #[structopt(long)]
    frames: Option<usize>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    columns: Option<ColumnConfig>,
    playback: PlaybackConfig,
}

impl Args {
    pub fn headless_frames(&self) -> usize {
        self.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES)
    }

    pub fn resolve(&self) -> Result<(ColumnConfig, PlaybackConfig)> {
        let file = match self.config {
            Some(ref path) => {
                let raw = fs_err::read_to_string(path)?;
                serde_json::from_str::<ConfigFile>(&raw)
                    .with_context(|| format!("parsing {path}"))?
            }
            None => ConfigFile::default(),
        };
        self.apply(file)
    }

    fn apply(&self, file: ConfigFile) -> Result<(ColumnConfig, PlaybackConfig)> {
        if self.frames.is_some() && !self.headless {
            bail!("--frames only makes sense with --headless");
        }

        let mut columns = match (file.columns, &self.lon, &self.lat, &self.time) {
            (_, Some(lon), Some(lat), Some(time)) => ColumnConfig::new(lon, lat, time),
            (Some(mut columns), lon, lat, time) => {
                if let Some(lon) = lon {
                    columns.lon = lon.clone();
                }
                if let Some(lat) = lat {
                    columns.lat = lat.clone();
                }
                if let Some(time) = time {
                    columns.time = time.clone();
                }
                columns
            }
            (None, _, _, _) => bail!("Specify --lon, --lat, and --time, or pass --config"),
        };
        if let Some(ref id) = self.id {
            columns.id = Some(id.clone());
        }
        if let Some(ref format) = self.time_format {
            columns.time_format = Some(format.clone());
        }

        let mut playback = file.playback;
        if let Some(speed) = self.speed {
            playback.speed = speed;
        }
        if !playback.speed.is_finite() || playback.speed <= 0.0 {
            bail!("Speed must be positive, not {}", playback.speed);
        }
        if self.no_trail {
            playback.show_trail = false;
        }
        if playback.ticks_per_second == 0 {
            bail!("ticks_per_second must be positive");
        }
        Ok((columns, playback))
    }
}
