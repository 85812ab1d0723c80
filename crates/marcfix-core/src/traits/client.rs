//! Record client trait.

use async_trait::async_trait;

use crate::Result;
use crate::record::{Record, UpdateOptions, UpdateResponse};
use crate::types::RecordId;

/// Access to the remote record API.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Fetch a record by id. Returns `Ok(None)` if the API has no such record.
    async fn load_record(&self, id: &RecordId) -> Result<Option<Record>>;

    /// Submit an updated record. The record's control number selects the
    /// record to overwrite.
    async fn update_record(
        &self,
        record: &Record,
        options: &UpdateOptions,
    ) -> Result<UpdateResponse>;
}
