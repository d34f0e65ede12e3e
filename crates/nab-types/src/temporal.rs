use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// The UTC calendar day a timestamp falls on.
///
/// Rendered as `year/month/day` with a 1-based month and no zero padding,
/// which is the segment layout of topic day buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayBucket {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DayBucket {
    pub fn from_millis(timestamp: i64) -> Result<Self, TypeError> {
        let dt: DateTime<Utc> = DateTime::from_timestamp_millis(timestamp)
            .ok_or(TypeError::InvalidTimestamp(timestamp))?;
        Ok(Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
        })
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}
