use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one track, exactly as it appeared in the input. Ordering is by the raw string, so
/// enumeration order (and thus color assignment) is stable across runs.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackID(String);

impl TrackID {
    /// The single track used when the input has no identifier column
    pub fn implicit() -> Self {
        Self("0".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackID {
    fn from(x: &str) -> Self {
        Self(x.to_string())
    }
}

impl From<String> for TrackID {
    fn from(x: String) -> Self {
        Self(x)
    }
}

impl fmt::Display for TrackID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
