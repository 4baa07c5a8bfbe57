use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JobSummary;
use crate::matching::{ScoreBreakdown, ScoredMatch};

/// GUI向けマッチング結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub job: JobSummary,
    /// 0〜100
    pub score: u8,
    /// 表示用の理由（最大3件、寄与の大きい順）
    pub reasons: Vec<String>,
    pub score_breakdown: ScoreBreakdown,
}

impl From<&ScoredMatch> for MatchResponse {
    fn from(value: &ScoredMatch) -> Self {
        Self {
            job: JobSummary::from(&value.job),
            score: value.score,
            reasons: value.reasons.clone(),
            score_breakdown: value.breakdown.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchResponse>,
    /// プロフィール正規化時の警告
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub matched_at: DateTime<Utc>,
}

impl MatchListResponse {
    pub fn new(matches: &[ScoredMatch], warnings: Vec<String>, matched_at: DateTime<Utc>) -> Self {
        Self {
            matches: matches.iter().map(MatchResponse::from).collect(),
            warnings,
            matched_at,
        }
    }
}
