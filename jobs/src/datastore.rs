//! Datastore seam for the jobs routes.
//!
//! The plugin owns no persistence; every handler delegates to whatever
//! [`Datastore`] the embedding server injects at registration time.
//! [`MemoryDatastore`] backs the plugin's own tests.

use std::collections::BTreeMap;

use serde::Deserialize;
use tokio::sync::RwLock;
use validator::Validate;

use ratchet_core::models::{Job, UpdateJobRequest};

#[derive(thiserror::Error, Debug)]
pub enum DatastoreError {
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

/// Page of results, 1-indexed.
#[derive(Deserialize, Validate, Debug, Clone, Copy)]
pub struct Page {
    #[validate(range(min = 1))]
    pub number: i64,
    #[validate(range(min = 1, max = 100))]
    pub size: i64,
}

#[async_trait::async_trait]
pub trait Datastore: Send + Sync {
    /// List jobs ordered by id.
    async fn list_jobs(
        &self,
        page: Page,
    ) -> Result<Vec<Job>, DatastoreError>;

    async fn get_job(
        &self,
        id: i64,
    ) -> Result<Option<Job>, DatastoreError>;

    /// Apply a partial update; `None` when the job does not exist.
    async fn update_job(
        &self,
        id: i64,
        update: UpdateJobRequest,
    ) -> Result<Option<Job>, DatastoreError>;
}

/// In-memory datastore keyed by job id.
#[derive(Default)]
pub struct MemoryDatastore {
    jobs: RwLock<BTreeMap<i64, Job>>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: impl IntoIterator<Item = Job>) -> Self {
        Self {
            jobs: RwLock::new(
                jobs.into_iter()
                    .map(|job| (job.id, job))
                    .collect(),
            ),
        }
    }

    pub async fn insert(
        &self,
        job: Job,
    ) {
        self.jobs.write().await.insert(job.id, job);
    }
}

#[async_trait::async_trait]
impl Datastore for MemoryDatastore {
    async fn list_jobs(
        &self,
        page: Page,
    ) -> Result<Vec<Job>, DatastoreError> {
        let jobs = self.jobs.read().await;

        // The routes validate `Page`, but the trait does not; clamp instead
        // of letting a negative product wrap through a cast.
        let size = usize::try_from(page.size).unwrap_or(0);
        let skip = usize::try_from(page.number - 1)
            .unwrap_or(0)
            .saturating_mul(size);

        Ok(jobs
            .values()
            .skip(skip)
            .take(size)
            .cloned()
            .collect())
    }

    async fn get_job(
        &self,
        id: i64,
    ) -> Result<Option<Job>, DatastoreError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_job(
        &self,
        id: i64,
        update: UpdateJobRequest,
    ) -> Result<Option<Job>, DatastoreError> {
        let mut jobs = self.jobs.write().await;

        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(state) = update.state {
            job.state = state;
        }
        if let Some(archived) = update.archived {
            job.archived = archived;
        }

        Ok(Some(job.clone()))
    }
}
