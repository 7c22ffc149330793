//! In-memory job store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::store::JobStore;
use crate::types::job::ParsedJobData;

/// In-memory job records keyed by `(user_id, job_id)`.
///
/// Clones share the same data. Not suitable for production as data is
/// lost on restart.
#[derive(Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<RwLock<HashMap<(String, String), ParsedJobData>>>,
}

impl MemoryJobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a saved job.
    pub fn get(&self, user_id: &str, job_id: &str) -> Option<ParsedJobData> {
        let jobs = self.jobs.read().unwrap_or_else(|e| e.into_inner());
        jobs.get(&(user_id.to_string(), job_id.to_string())).cloned()
    }

    /// All jobs saved for a user.
    pub fn jobs_for_user(&self, user_id: &str) -> Vec<(String, ParsedJobData)> {
        let jobs = self.jobs.read().unwrap_or_else(|e| e.into_inner());
        jobs.iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|((_, id), job)| (id.clone(), job.clone()))
            .collect()
    }

    /// Total number of saved jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn save_job(&self, user_id: &str, job: &ParsedJobData) -> Result<String, StoreError> {
        // v7 ids sort by creation time
        let id = Uuid::now_v7().to_string();
        let mut jobs = self
            .jobs
            .write()
            .map_err(|e| StoreError(e.to_string().into()))?;
        jobs.insert((user_id.to_string(), id.clone()), job.clone());
        Ok(id)
    }
}
