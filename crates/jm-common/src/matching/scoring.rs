use serde::{Deserialize, Serialize};

use super::{
    experience::evaluate_experience,
    industry::industry_fit,
    location::evaluate_location,
    salary::evaluate_salary,
    skills::evaluate_skills,
    weights::{DEFAULT_POINTS, Points},
};
use crate::{CandidateProfile, JobOpening};

const MAX_REASONS: usize = 3;
const MIN_REASONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    PerfectMatch,
    Match,
    PartialMatch,
    Miss,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub points: f64,
    pub max_points: f64,
    pub status: MatchStatus,
    /// Evidence text; doubles as the reason when `points > 0`.
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: ComponentScore,
    pub experience: ComponentScore,
    pub location: ComponentScore,
    pub salary: ComponentScore,
    /// Matched industry evidence; worth no points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_fit: Option<String>,
}

impl ScoreBreakdown {
    pub fn total_points(&self) -> f64 {
        self.components().iter().map(|c| c.points).sum()
    }

    /// Components in tie-break order.
    fn components(&self) -> [&ComponentScore; 4] {
        [&self.skills, &self.experience, &self.location, &self.salary]
    }

    /// Evidence of contributing components, highest contribution first.
    /// Industry fit is appended only while the list is shorter than two.
    pub fn reasons(&self) -> Vec<String> {
        let mut contributing: Vec<&ComponentScore> = self
            .components()
            .into_iter()
            .filter(|component| component.points > 0.0)
            .collect();

        // stable: equal contributions keep component order
        contributing.sort_by(|a, b| b.points.total_cmp(&a.points));

        let mut reasons: Vec<String> = contributing
            .into_iter()
            .take(MAX_REASONS)
            .map(|component| component.details.clone())
            .collect();

        if reasons.len() < MIN_REASONS {
            reasons.extend(self.industry_fit.clone());
        }
        reasons
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub job: JobOpening,
    /// 0..=100
    pub score: u8,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub points: Points,
    pub experience_buffer_years: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            experience_buffer_years: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Reads `JM_EXPERIENCE_BUFFER_YEARS`; point allocation is fixed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            experience_buffer_years: std::env::var("JM_EXPERIENCE_BUFFER_YEARS")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(defaults.experience_buffer_years),
            ..defaults
        }
    }
}

/// Deterministic scorer; holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, profile: &CandidateProfile, job: &JobOpening) -> ScoredMatch {
        let points = self.config.points;

        let breakdown = ScoreBreakdown {
            skills: evaluate_skills(&profile.skill_set(), job, points.skills),
            experience: evaluate_experience(
                profile.experience_years,
                job,
                points.experience,
                self.config.experience_buffer_years,
            ),
            location: evaluate_location(profile, job, points.location),
            salary: evaluate_salary(profile.desired_salary.as_ref(), job, points.salary),
            industry_fit: industry_fit(profile, job),
        };

        let score = breakdown.total_points().clamp(0.0, 100.0).round() as u8;
        let reasons = breakdown.reasons();

        ScoredMatch {
            job: job.clone(),
            score,
            reasons,
            breakdown,
        }
    }
}

/// Score with the default configuration.
pub fn score(profile: &CandidateProfile, job: &JobOpening) -> ScoredMatch {
    Scorer::default().score(profile, job)
}
