//! Allowed processing window type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, WindowError};

/// A daily window of hours, written `HH-HH`.
///
/// The start hour is inclusive and the end hour exclusive. A start hour at
/// or after the end hour means the window wraps past midnight.
///
/// # Example
///
/// ```
/// use marcfix_core::TimeWindow;
///
/// let nightly: TimeWindow = "19-06".parse().unwrap();
/// assert!(nightly.wraps_midnight());
/// assert!(nightly.contains_hour(4));
/// assert!(!nightly.contains_hour(10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: u32,
    end: u32,
}

impl TimeWindow {
    /// Parse a window from its `HH-HH` form.
    ///
    /// # Errors
    ///
    /// [`WindowError::Malformed`] unless the input is two two-digit numbers
    /// separated by `-`; [`WindowError::InvalidRange`] if an hour is above 23.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let malformed = || WindowError::Malformed {
            value: s.to_string(),
        };

        let (start, end) = s.split_once('-').ok_or_else(malformed)?;
        let start = Self::parse_hour(start).ok_or_else(malformed)?;
        let end = Self::parse_hour(end).ok_or_else(malformed)?;

        if start > 23 || end > 23 {
            return Err(WindowError::InvalidRange {
                value: s.to_string(),
            }
            .into());
        }

        Ok(Self { start, end })
    }

    /// Returns the inclusive start hour.
    pub fn start_hour(&self) -> u32 {
        self.start
    }

    /// Returns the exclusive end hour.
    pub fn end_hour(&self) -> u32 {
        self.end
    }

    /// Returns true if the window spans midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if the given hour of day falls inside the window.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.wraps_midnight() {
            hour >= self.start || hour < self.end
        } else {
            self.start <= hour && hour < self.end
        }
    }

    fn parse_hour(s: &str) -> Option<u32> {
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start, self.end)
    }
}

impl FromStr for TimeWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for TimeWindow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TimeWindow::new(&s).map_err(serde::de::Error::custom)
    }
}
