//! Fix results and their persisted projection.

use serde::{Deserialize, Serialize};

use super::{Record, UpdateResponse, ValidationReport};
use crate::error::{Error, StoreError};
use crate::types::RecordId;

/// The outcome of validating a record without updating it.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// The record id.
    pub id: RecordId,
    /// Snapshot taken before any validator ran.
    pub original_record: Record,
    /// The record after validation.
    pub validated_record: Record,
    /// The canonical report (from the revalidation pass, if one ran).
    pub report: ValidationReport,
    /// Whether a revalidation pass ran.
    pub revalidated: bool,
}

/// The outcome of fixing a single record.
///
/// `update_response` is `None` exactly when no update was submitted,
/// because validation left the record unchanged.
#[derive(Debug, Clone)]
pub struct FixResult {
    /// The record id.
    pub id: RecordId,
    /// Snapshot taken before any validator ran.
    pub original_record: Record,
    /// The record as submitted to the API.
    pub validated_record: Record,
    /// The canonical validation report.
    pub report: ValidationReport,
    /// Whether a revalidation pass ran.
    pub revalidated: bool,
    /// The API response, if an update was submitted.
    pub update_response: Option<UpdateResponse>,
}

impl FixResult {
    /// Returns true if validation changed the record.
    pub fn changed(&self) -> bool {
        self.original_record != self.validated_record
    }

    /// Returns true if an update was submitted.
    pub fn updated(&self) -> bool {
        self.update_response.is_some()
    }
}

/// A persisted backup of one fix result.
///
/// Records are stored in their serialized JSON form so an entry stays
/// readable even if the record model grows new fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEntry {
    /// Record id, unique within a batch.
    pub id: RecordId,
    /// Serialized record before the fix.
    pub original_record: String,
    /// Serialized record after the fix.
    pub validated_record: String,
    /// The validation report.
    pub report: ValidationReport,
    /// The API response, if an update was submitted.
    #[serde(default)]
    pub update_response: Option<UpdateResponse>,
}

impl BackupEntry {
    /// Project a fix result into its persisted form.
    pub fn from_result(result: &FixResult) -> Result<Self, Error> {
        Ok(Self {
            id: result.id,
            original_record: encode(&result.original_record)?,
            validated_record: encode(&result.validated_record)?,
            report: result.report.clone(),
            update_response: result.update_response.clone(),
        })
    }

    /// Decode the pre-fix record.
    pub fn original(&self) -> Result<Record, Error> {
        decode(&self.original_record)
    }
}

fn encode(record: &Record) -> Result<String, Error> {
    serde_json::to_string(record).map_err(|e| {
        StoreError::Serialization {
            message: e.to_string(),
        }
        .into()
    })
}

fn decode(s: &str) -> Result<Record, Error> {
    serde_json::from_str(s).map_err(|e| {
        StoreError::Serialization {
            message: e.to_string(),
        }
        .into()
    })
}
