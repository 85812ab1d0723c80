//! Record client selected by the API URL scheme.

use async_trait::async_trait;

use marcfix_core::{Record, RecordClient, RecordId, Result, UpdateOptions, UpdateResponse};
use marcfix_file::FileRecordClient;
use marcfix_http::HttpRecordClient;

/// Record client wrapper for CLI use.
#[derive(Debug)]
pub enum CliClient {
    File(FileRecordClient),
    Http(HttpRecordClient),
}

#[async_trait]
impl RecordClient for CliClient {
    async fn load_record(&self, id: &RecordId) -> Result<Option<Record>> {
        match self {
            CliClient::File(client) => client.load_record(id).await,
            CliClient::Http(client) => client.load_record(id).await,
        }
    }

    async fn update_record(
        &self,
        record: &Record,
        options: &UpdateOptions,
    ) -> Result<UpdateResponse> {
        match self {
            CliClient::File(client) => client.update_record(record, options).await,
            CliClient::Http(client) => client.update_record(record, options).await,
        }
    }
}
