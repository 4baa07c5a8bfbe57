use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    ranking::{InvalidTopNError, TopN, rank_top},
    scoring::{ScoredMatch, Scorer, ScoringConfig},
};
use crate::{
    CandidateProfile, JobId,
    job_index::{JobIndex, JobIndexError},
    normalize::{MalformedSalaryError, NormalizedProfile, RawProfile, normalize, try_normalize},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error(transparent)]
    InvalidTopN(#[from] InvalidTopNError),
    #[error(transparent)]
    MalformedSalary(#[from] MalformedSalaryError),
    #[error("job opening not found: {0}")]
    NotFound(JobId),
    #[error("job source unavailable: {0}")]
    SourceUnavailable(String),
}

impl From<JobIndexError> for MatchError {
    fn from(value: JobIndexError) -> Self {
        match value {
            JobIndexError::NotFound(id) => MatchError::NotFound(id),
            JobIndexError::SourceUnavailable(msg) => MatchError::SourceUnavailable(msg),
        }
    }
}

/// Profile as supplied by the caller, tagged with whether it is already normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileInput {
    Raw(RawProfile),
    Normalized(CandidateProfile),
}

impl ProfileInput {
    /// Normalize raw input. With `strict_salary` a malformed salary fails the
    /// request; otherwise it is dropped and reported as a warning.
    pub fn resolve(self, strict_salary: bool) -> Result<NormalizedProfile, MalformedSalaryError> {
        let normalized = match self {
            ProfileInput::Normalized(profile) => NormalizedProfile {
                profile,
                warnings: Vec::new(),
            },
            ProfileInput::Raw(raw) if strict_salary => try_normalize(&raw)?,
            ProfileInput::Raw(raw) => normalize(&raw),
        };

        for warning in &normalized.warnings {
            warn!(profile_id = ?normalized.profile.id, %warning, "profile field recovered");
        }
        Ok(normalized)
    }

    pub fn into_profile(self, strict_salary: bool) -> Result<CandidateProfile, MalformedSalaryError> {
        self.resolve(strict_salary).map(|normalized| normalized.profile)
    }
}

/// Scores a profile against every opening of a job index and ranks the result.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    scorer: Scorer,
    default_top_n: TopN,
}

impl MatchingEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            scorer: Scorer::new(config),
            default_top_n: TopN::default(),
        }
    }

    /// Result size used when a request carries no override.
    pub fn with_default_top_n(mut self, top_n: TopN) -> Self {
        self.default_top_n = top_n;
        self
    }

    /// The listing fetch is the only await point; scoring runs to completion.
    pub async fn match_profile(
        &self,
        index: &dyn JobIndex,
        profile: &CandidateProfile,
        top_n: Option<i64>,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let top_n = top_n.map_or(Ok(self.default_top_n), TopN::new)?;
        let openings = index.list_openings().await?;

        let scored: Vec<ScoredMatch> = openings
            .iter()
            .map(|job| {
                let result = self.scorer.score(profile, job);
                debug!(job_id = job.id, score = result.score, "scored opening");
                result
            })
            .collect();

        let ranked = rank_top(scored, top_n);

        info!(
            source = index.name(),
            profile_id = ?profile.id,
            openings = openings.len(),
            returned = ranked.len(),
            top_score = ranked.first().map(|m| m.score),
            "matching completed"
        );

        Ok(ranked)
    }

    /// Re-score one (profile, opening) pair.
    pub async fn score_single(
        &self,
        index: &dyn JobIndex,
        profile: &CandidateProfile,
        job_id: JobId,
    ) -> Result<ScoredMatch, MatchError> {
        let job = index.by_id(job_id).await?;
        Ok(self.scorer.score(profile, &job))
    }
}
