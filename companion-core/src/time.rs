//! Wall-clock helpers: "HH:MM" strings, minute offsets and the 30-minute grid.

use crate::CoreError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of every grid operation.
pub const SLOT_MINUTES: u32 = 30;
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses a 24-hour "HH:MM" string into minutes since midnight.
pub fn time_to_minutes(time: &str) -> Result<u32, CoreError> {
    if time.len() != 5 || time.as_bytes()[2] != b':' {
        return Err(CoreError::Invalid("time must be HH:MM"));
    }
    let t = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| CoreError::Invalid("time must be HH:MM"))?;
    Ok(t.hour() * 60 + t.minute())
}

pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// "13:05" -> "1:05 PM". Unparseable input comes back untouched.
pub fn format_for_service(time: &str) -> String {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(t) => t.format("%-I:%M %p").to_string(),
        Err(_) => time.to_string(),
    }
}

pub fn floor_to_slot(minutes: u32) -> u32 {
    minutes - minutes % SLOT_MINUTES
}

/// Grid labels for a whole day: "00:00", "00:30", ... "23:30".
pub fn time_slots() -> Vec<String> {
    (0..MINUTES_PER_DAY)
        .step_by(SLOT_MINUTES as usize)
        .map(minutes_to_time)
        .collect()
}

/// Human label for a break length: "3h", "1h 30m", "45m".
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, 0) => "Break".to_string(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// A minute of the day, serialized as "HH:MM".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(u16);

impl WallTime {
    pub fn from_minutes(minutes: u32) -> Result<Self, CoreError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(CoreError::Invalid("time must be before 24:00"));
        }
        Ok(Self(minutes as u16))
    }

    pub const fn hm(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    /// Clamps to 23:59.
    pub fn saturating(minutes: u32) -> Self {
        Self(minutes.min(MINUTES_PER_DAY - 1) as u16)
    }

    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    pub fn is_on_grid(self) -> bool {
        self.minutes() % SLOT_MINUTES == 0
    }
}

impl FromStr for WallTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time_to_minutes(s.trim()).map(|m| Self(m as u16))
    }
}

impl TryFrom<String> for WallTime {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WallTime> for String {
    fn from(t: WallTime) -> Self {
        t.to_string()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time(self.minutes()))
    }
}
