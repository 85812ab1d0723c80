//! The single-record fix pipeline.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::diff::RecordDiffGuard;
use crate::Result;
use crate::error::Error;
use crate::record::{FixResult, Record, UpdateOptions, ValidationOutcome};
use crate::traits::{RecordClient, Validator};
use crate::types::RecordId;

/// Loads, validates and updates individual records.
///
/// A fixer is cheap to clone: the client and validator are shared.
pub struct Fixer<C, V> {
    client: Arc<C>,
    validator: Arc<V>,
}

impl<C, V> Clone for Fixer<C, V> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<C: RecordClient, V: Validator> Fixer<C, V> {
    /// Create a fixer over a record client and a validator.
    pub fn new(client: Arc<C>, validator: Arc<V>) -> Self {
        Self { client, validator }
    }

    /// The record client.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Load a record without validating it.
    pub async fn show(&self, id: &str) -> Result<Record> {
        let id = RecordId::new(id)?;
        self.load(id).await
    }

    /// Validate a record without submitting an update.
    pub async fn validate_record(&self, id: &str) -> Result<ValidationOutcome> {
        let id = RecordId::new(id)?;
        self.validate_id(id).await
    }

    /// Validate a record by parsed id.
    #[instrument(skip(self), fields(%id))]
    pub async fn validate_id(&self, id: RecordId) -> Result<ValidationOutcome> {
        let record = self.load(id).await?;
        self.validate_loaded(id, record).await
    }

    /// Validate a record and submit the fixed version if it changed.
    pub async fn fix_one(&self, id: &str) -> Result<FixResult> {
        let id = RecordId::new(id)?;
        self.fix_id(id).await
    }

    /// Fix a record by parsed id.
    ///
    /// The record is validated once, and once more if the first pass changed
    /// it. The update is submitted with low-level validation bypassed, and
    /// only if the final record differs from the original.
    #[instrument(skip(self), fields(%id))]
    pub async fn fix_id(&self, id: RecordId) -> Result<FixResult> {
        let record = self.load(id).await?;
        let outcome = self.validate_loaded(id, record).await?;

        let diff = RecordDiffGuard::decide(&outcome.original_record, &outcome.validated_record);
        let update_response = if diff.needs_update() {
            let options = UpdateOptions {
                bypass_low_validation: true,
            };
            let response = self
                .client
                .update_record(&outcome.validated_record, &options)
                .await?;
            info!(messages = %response.message_text(), "record updated");
            Some(response)
        } else {
            debug!("record unchanged, skipping update");
            None
        };

        Ok(FixResult {
            id,
            original_record: outcome.original_record,
            validated_record: outcome.validated_record,
            report: outcome.report,
            revalidated: outcome.revalidated,
            update_response,
        })
    }

    async fn load(&self, id: RecordId) -> Result<Record> {
        self.client
            .load_record(&id)
            .await?
            .ok_or(Error::NotFound(id))
    }

    async fn validate_loaded(&self, id: RecordId, mut record: Record) -> Result<ValidationOutcome> {
        let original_record = record.clone();

        let mut report = self.validator.validate(&mut record).await?;
        let revalidated = RecordDiffGuard::decide(&original_record, &record).needs_revalidation();
        if revalidated {
            debug!("record changed, revalidating");
            report = self.validator.validate(&mut record).await?;
        }

        Ok(ValidationOutcome {
            id,
            original_record,
            validated_record: record,
            report,
            revalidated,
        })
    }
}
