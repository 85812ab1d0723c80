//! Record, report and result types.

mod marc;
mod report;
mod response;
mod result;

pub use marc::{CATALOGING_TAG, CONTROL_NUMBER_TAG, Field, Record, Subfield};
pub use report::{FieldFix, Finding, FindingKind, ValidationReport, ValidatorReport};
pub use response::{ApiMessage, UpdateOptions, UpdateResponse};
pub use result::{BackupEntry, FixResult, ValidationOutcome};
