//! Validator trait.

use async_trait::async_trait;

use crate::Result;
use crate::record::{Record, ValidationReport};

/// A rule engine that checks a record and may fix it in place.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate the record, applying fixes in place, and report what was found.
    async fn validate(&self, record: &mut Record) -> Result<ValidationReport>;
}
