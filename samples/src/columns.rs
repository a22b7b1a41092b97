use anyhow::Result;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Names the input columns explicitly. Coordinates must already be WGS84 degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub lon: String,
    pub lat: String,
    pub time: String,
    /// Without this, every row belongs to one implicit track
    pub id: Option<String>,
    /// A chrono format string; detected per value when absent
    pub time_format: Option<String>,
}

impl ColumnConfig {
    pub fn new(lon: &str, lat: &str, time: &str) -> Self {
        Self {
            lon: lon.to_string(),
            lat: lat.to_string(),
            time: time.to_string(),
            id: None,
            time_format: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_time_format(mut self, format: &str) -> Self {
        self.time_format = Some(format.to_string());
        self
    }

    pub(crate) fn resolve(&self, headers: &StringRecord) -> Result<ColumnIndices> {
        let available: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
        let find = |name: &str| -> Result<usize> {
            match available.iter().position(|h| *h == name.trim()) {
                Some(idx) => Ok(idx),
                None => bail!(
                    "No column named {:?}; the available columns are {:?}",
                    name,
                    available
                ),
            }
        };

        let indices = ColumnIndices {
            lon: find(&self.lon)?,
            lat: find(&self.lat)?,
            time: find(&self.time)?,
            id: match self.id {
                Some(ref name) => Some(find(name)?),
                None => None,
            },
        };
        if indices.lon == indices.lat {
            bail!("Longitude and latitude can't both come from {:?}", self.lon);
        }
        Ok(indices)
    }
}

pub(crate) struct ColumnIndices {
    pub lon: usize,
    pub lat: usize,
    pub time: usize,
    pub id: Option<usize>,
}
