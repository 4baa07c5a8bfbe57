pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::{JobId, JobOpening};

pub use memory::{InMemoryJobIndex, JobIndexLoadError, load_openings_from_json, parse_openings_json};
pub use postgres::PgJobIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobIndexError {
    #[error("job opening not found: {0}")]
    NotFound(JobId),
    #[error("job source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Read-only source of open positions.
///
/// Implementations never mutate openings while a scoring request runs.
#[async_trait]
pub trait JobIndex: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list_openings(&self) -> Result<Vec<JobOpening>, JobIndexError>;

    async fn by_id(&self, id: JobId) -> Result<JobOpening, JobIndexError>;
}
