//! Record id type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Exclusive upper bound for record ids.
const MAX_ID: u32 = 100_000_000;

/// Width of the zero-padded form used in API calls and backup keys.
const PADDED_WIDTH: usize = 9;

/// A validated bibliographic record id.
///
/// A record id is a string of decimal digits whose numeric value is in
/// `1..100_000_000`. Leading zeros are accepted, and the canonical form is
/// zero-padded to nine digits.
///
/// # Example
///
/// ```
/// use marcfix_core::RecordId;
///
/// let id = RecordId::new("9877349").unwrap();
/// assert_eq!(id.padded(), "009877349");
/// assert_eq!(id.value(), 9877349);
///
/// assert!(RecordId::new("0").is_err());
/// assert!(RecordId::new("1 23").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u32);

impl RecordId {
    /// Parse a record id, rejecting anything that is not a valid id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] for empty strings, non-digit characters,
    /// zero, or values of 100,000,000 and above.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        Self::parse(s).ok_or_else(|| Error::InvalidId(s.to_string()))
    }

    /// Returns true if the string is a valid record id.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the nine-digit zero-padded form.
    pub fn padded(&self) -> String {
        format!("{:0width$}", self.0, width = PADDED_WIDTH)
    }

    fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        // At most eight significant digits fit below MAX_ID.
        let significant = s.trim_start_matches('0');
        if significant.is_empty() || significant.len() > 8 {
            return None;
        }

        let value: u32 = significant.parse().ok()?;
        (value > 0 && value < MAX_ID).then_some(Self(value))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = PADDED_WIDTH)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.padded())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::new(&s).map_err(serde::de::Error::custom)
    }
}
