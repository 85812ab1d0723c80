//! Batch id type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Identifier of one run of the multi-record pipeline.
///
/// Batch ids name backup collections on disk, so they are restricted to
/// ASCII alphanumerics, `-`, `_` and `.`, and may not start with `.`.
/// Generated ids are derived from the current time and sort
/// chronologically.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use marcfix_core::BatchId;
///
/// let at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(BatchId::at(at).as_str(), "batch-20000101T000000000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(String);

impl BatchId {
    /// Create a batch id from a string, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Generate a batch id for the current instant.
    pub fn generate() -> Self {
        Self::at(Utc::now())
    }

    /// Derive the batch id for a given instant.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(format!("batch-{}", time.format("%Y%m%dT%H%M%S%3f")))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let reason = if s.is_empty() {
            Some("must not be empty")
        } else if s.len() > 128 {
            Some("must be at most 128 characters")
        } else if s.starts_with('.') {
            Some("must not start with '.'")
        } else if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            Some("may only contain ASCII letters, digits, '-', '_' and '.'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidInputError::BatchId {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BatchId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for BatchId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BatchId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BatchId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn same_instant_same_id() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(BatchId::at(at), BatchId::at(at));
        assert_ne!(BatchId::generate(), BatchId::at(at));
    }

    #[test]
    fn generated_ids_sort_chronologically() {
        let earlier = BatchId::at(Utc.with_ymd_and_hms(2018, 2, 1, 4, 0, 0).unwrap());
        let later = BatchId::at(Utc.with_ymd_and_hms(2018, 11, 1, 4, 0, 0).unwrap());
        assert!(earlier < later);
    }

    #[test]
    fn generated_ids_pass_validation() {
        let id = BatchId::generate();
        assert!(BatchId::new(id.as_str()).is_ok());
        assert!(id.as_str().chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn rejects_path_like_ids() {
        assert!(BatchId::new("").is_err());
        assert!(BatchId::new("../etc").is_err());
        assert!(BatchId::new(".hidden").is_err());
        assert!(BatchId::new("a/b").is_err());
        assert!(BatchId::new("nightly_2018-02-01.run1").is_ok());
    }
}
