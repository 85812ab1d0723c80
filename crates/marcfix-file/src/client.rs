//! A record API backed by a local directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use marcfix_core::Result;
use marcfix_core::error::{ApiError, ClientError, Error, InvalidInputError, StoreError};
use marcfix_core::record::{ApiMessage, Record, UpdateOptions, UpdateResponse};
use marcfix_core::traits::RecordClient;
use marcfix_core::types::{ApiUrl, RecordId};

use crate::store::{StoreLock, read_json, write_json};

/// Serves records stored as `records/{id}.json` under a root directory.
///
/// Updates overwrite existing records only, the way the remote API does.
#[derive(Debug, Clone)]
pub struct FileRecordClient {
    root: PathBuf,
}

impl FileRecordClient {
    /// Create a client over the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Create a client from a `file://` API URL.
    pub fn from_url(url: &ApiUrl) -> Result<Self> {
        let root = url.to_file_path().ok_or_else(|| {
            Error::InvalidInput(InvalidInputError::ApiUrl {
                value: url.to_string(),
                reason: "not a local file URL".to_string(),
            })
        })?;
        Ok(Self::new(root))
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a record, creating it if needed.
    pub fn insert(&self, record: &Record) -> Result<RecordId> {
        let id = record.id()?;
        let _lock = self.lock()?;
        write_json(&self.record_path(&id), record)?;
        Ok(id)
    }

    fn lock(&self) -> Result<StoreLock> {
        StoreLock::acquire(&self.root.join("records.lock"))
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.root.join("records").join(format!("{}.json", id.padded()))
    }
}

fn decode_error(err: Error) -> Error {
    Error::Client(ClientError::Decode {
        message: err.to_string(),
    })
}

#[async_trait]
impl RecordClient for FileRecordClient {
    #[instrument(skip(self), fields(%id))]
    async fn load_record(&self, id: &RecordId) -> Result<Option<Record>> {
        let _lock = self.lock()?;
        read_json(&self.record_path(id)).map_err(|err| match err {
            Error::Store(StoreError::Serialization { .. }) => decode_error(err),
            other => other,
        })
    }

    #[instrument(skip(self, record), fields(bypass = options.bypass_low_validation))]
    async fn update_record(
        &self,
        record: &Record,
        options: &UpdateOptions,
    ) -> Result<UpdateResponse> {
        let id = record.id()?;
        let _lock = self.lock()?;

        let path = self.record_path(&id);
        if !path.exists() {
            return Err(ClientError::Api(ApiError::new(
                404,
                Some(format!("Record {} not found", id)),
            ))
            .into());
        }

        write_json(&path, record)?;
        debug!(%id, "record written");

        Ok(UpdateResponse {
            messages: vec![ApiMessage::new(format!("Record {} updated", id))],
            ..Default::default()
        })
    }
}
