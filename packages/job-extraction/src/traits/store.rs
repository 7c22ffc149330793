//! Persistence collaborator for imported jobs.
//!
//! The pipeline never writes to storage on its own; the batch importer
//! hands validated records to a [`JobStore`] only when the caller asks
//! for `save_immediately`.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::job::ParsedJobData;

/// Stores validated job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist `job` for `user_id` and return the stored record's id.
    async fn save_job(&self, user_id: &str, job: &ParsedJobData) -> Result<String, StoreError>;
}
