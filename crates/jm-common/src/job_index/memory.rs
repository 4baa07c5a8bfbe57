use std::{collections::HashSet, path::Path};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::{JobIndex, JobIndexError};
use crate::{JobId, JobOpening};

#[derive(Debug, Error)]
pub enum JobIndexLoadError {
    #[error("failed to read job openings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse job openings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate job opening id: {0}")]
    DuplicateId(JobId),
    #[error("job opening {0} has an invalid salary range")]
    InvalidSalaryRange(JobId),
}

/// Read-only view over a caller-supplied collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobIndex {
    openings: Vec<JobOpening>,
}

impl InMemoryJobIndex {
    pub fn new(openings: Vec<JobOpening>) -> Result<Self, JobIndexLoadError> {
        let mut seen = HashSet::with_capacity(openings.len());
        for opening in &openings {
            if !seen.insert(opening.id) {
                return Err(JobIndexLoadError::DuplicateId(opening.id));
            }
            if !opening.salary_range.is_valid() {
                return Err(JobIndexLoadError::InvalidSalaryRange(opening.id));
            }
        }
        Ok(Self { openings })
    }

    pub fn len(&self) -> usize {
        self.openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }
}

#[async_trait]
impl JobIndex for InMemoryJobIndex {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_openings(&self) -> Result<Vec<JobOpening>, JobIndexError> {
        Ok(self.openings.clone())
    }

    async fn by_id(&self, id: JobId) -> Result<JobOpening, JobIndexError> {
        self.openings
            .iter()
            .find(|opening| opening.id == id)
            .cloned()
            .ok_or(JobIndexError::NotFound(id))
    }
}

pub fn parse_openings_json(body: &str) -> Result<InMemoryJobIndex, JobIndexLoadError> {
    let openings: Vec<JobOpening> = serde_json::from_str(body)?;
    InMemoryJobIndex::new(openings)
}

/// Load a JSON array of openings into a validated in-memory index.
pub fn load_openings_from_json(path: impl AsRef<Path>) -> Result<InMemoryJobIndex, JobIndexLoadError> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path)?;
    let index = parse_openings_json(&body)?;

    if index.is_empty() {
        warn!(path = %path.display(), "job openings file is empty");
    }
    info!(path = %path.display(), openings = index.len(), "loaded job openings");
    Ok(index)
}
