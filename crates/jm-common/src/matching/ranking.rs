use std::num::NonZeroUsize;

use thiserror::Error;

use super::scoring::ScoredMatch;

pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("top_n must be a positive integer, got {0}")]
pub struct InvalidTopNError(pub i64);

/// Validated result size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN(NonZeroUsize);

impl TopN {
    pub fn new(n: i64) -> Result<Self, InvalidTopNError> {
        usize::try_from(n)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(InvalidTopNError(n))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_TOP_N).unwrap_or(NonZeroUsize::MIN))
    }
}

/// Sort by score descending, ties by job id ascending, then truncate.
pub fn rank(matches: Vec<ScoredMatch>, top_n: i64) -> Result<Vec<ScoredMatch>, InvalidTopNError> {
    let top_n = TopN::new(top_n)?;
    Ok(rank_top(matches, top_n))
}

pub fn rank_top(mut matches: Vec<ScoredMatch>, top_n: TopN) -> Vec<ScoredMatch> {
    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.job.id.cmp(&b.job.id)));
    matches.truncate(top_n.get());
    matches
}
