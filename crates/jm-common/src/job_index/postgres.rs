use async_trait::async_trait;
use tracing::warn;

use super::{JobIndex, JobIndexError};
use crate::{
    JobId, JobOpening,
    db::{JobOpeningFetchError, PgPool, fetch_job_opening, fetch_open_job_openings},
};

/// Openings read from the `job_openings` table.
///
/// Pool or query failures surface as `SourceUnavailable` so the caller can
/// apply its own retry policy; nothing is retried here.
#[derive(Clone)]
pub struct PgJobIndex {
    pool: PgPool,
}

impl PgJobIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: JobOpeningFetchError) -> JobIndexError {
    warn!(error = %err, "job_openings fetch failed");
    JobIndexError::SourceUnavailable(err.to_string())
}

#[async_trait]
impl JobIndex for PgJobIndex {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn list_openings(&self) -> Result<Vec<JobOpening>, JobIndexError> {
        fetch_open_job_openings(&self.pool).await.map_err(unavailable)
    }

    async fn by_id(&self, id: JobId) -> Result<JobOpening, JobIndexError> {
        fetch_job_opening(&self.pool, id)
            .await
            .map_err(unavailable)?
            .ok_or(JobIndexError::NotFound(id))
    }
}
