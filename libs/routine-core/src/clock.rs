//! Wall-clock time of day in `HH:MM` form.
//!
//! Values are naive local times as configured by the user; no timezone
//! conversion happens here. Comparisons use minutes since midnight.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// Build from hour (0-23) and minute (0-59).
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Build from minutes since midnight, wrapping past 24 hours.
    pub fn from_minutes(total: u32) -> Self {
        Self {
            minutes: (total % MINUTES_PER_DAY) as u16,
        }
    }

    /// Convert a chrono time, dropping seconds.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self::from_minutes(time.hour() * 60 + time.minute())
    }

    /// Minutes since midnight (0-1439).
    pub fn minutes(self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Add minutes, wrapping past midnight.
    pub fn add_minutes(self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes() + minutes % MINUTES_PER_DAY)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    /// Accepts `HH:MM` and `H:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let format_err = || TimeError::Format {
            value: value.to_string(),
        };

        let (hours, minutes) = value.split_once(':').ok_or_else(format_err)?;
        let well_formed = (1..=2).contains(&hours.len())
            && minutes.len() == 2
            && hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(format_err());
        }

        let hour: u32 = hours.parse().map_err(|_| format_err())?;
        let minute: u32 = minutes.parse().map_err(|_| format_err())?;

        if hour >= 24 {
            return Err(TimeError::Hour {
                value: value.to_string(),
            });
        }
        if minute >= 60 {
            return Err(TimeError::Minute {
                value: value.to_string(),
            });
        }

        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
