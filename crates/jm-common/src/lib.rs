pub mod api;
pub mod db;
pub mod job_index;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod skill_normalizer;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use skill_normalizer::normalize_skill_set;

pub type JobId = i64;

/// Desired salary in 万円 (10,000 JPY) after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesiredSalary {
    Range { min: f64, max: f64 },
    Minimum { amount: f64 },
    Exact { amount: f64 },
}

impl DesiredSalary {
    /// Lower bound and optional upper bound (None = unbounded).
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match *self {
            DesiredSalary::Range { min, max } => (min, Some(max)),
            DesiredSalary::Minimum { amount } => (amount, None),
            DesiredSalary::Exact { amount } => (amount, Some(amount)),
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            DesiredSalary::Range { min, max } => format!("{min}〜{max}万円"),
            DesiredSalary::Minimum { amount } => format!("{amount}万円以上"),
            DesiredSalary::Exact { amount } => format!("{amount}万円"),
        }
    }
}

// Canonical job-seeker profile used by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub skills: BTreeMap<String, BTreeSet<String>>,
    /// None = unknown. Some(0) is a stated zero.
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub desired_locations: BTreeSet<String>,
    #[serde(default)]
    pub desired_salary: Option<DesiredSalary>,
    #[serde(default)]
    pub work_preferences: BTreeSet<String>,
    #[serde(default)]
    pub industries: BTreeSet<String>,
}

impl CandidateProfile {
    /// Union of every category's skills, canonicalized.
    pub fn skill_set(&self) -> BTreeSet<String> {
        normalize_skill_set(self.skills.values().flatten())
    }

    pub fn prefers_remote(&self) -> bool {
        const REMOTE_MARKERS: [&str; 4] = ["remote", "リモート", "在宅", "テレワーク"];

        self.work_preferences.iter().any(|pref| {
            let pref = pref.to_lowercase();
            REMOTE_MARKERS.iter().any(|marker| pref.contains(marker))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
}

/// Offered salary in 万円. Invariant: min <= max.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOpening {
    pub id: JobId,
    pub company: Company,
    pub position: String,
    pub salary_range: SalaryRange,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl JobOpening {
    pub fn required_skill_set(&self) -> BTreeSet<String> {
        normalize_skill_set(&self.required_skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_set_unions_categories_and_canonicalizes() {
        let mut profile = CandidateProfile::default();
        profile
            .skills
            .insert("backend".into(), ["Python".to_string(), "Go".to_string()].into());
        profile
            .skills
            .insert("frontend".into(), ["React.js".to_string(), "python".to_string()].into());

        let skills = profile.skill_set();
        assert_eq!(
            skills.into_iter().collect::<Vec<_>>(),
            vec!["golang", "python", "react"]
        );
    }

    #[test]
    fn detects_remote_preferences() {
        let mut profile = CandidateProfile::default();
        assert!(!profile.prefers_remote());

        profile.work_preferences.insert("フレックス制".into());
        assert!(!profile.prefers_remote());

        profile.work_preferences.insert("リモートワーク".into());
        assert!(profile.prefers_remote());

        profile.work_preferences.clear();
        profile.work_preferences.insert("Full Remote".into());
        assert!(profile.prefers_remote());
    }

    #[test]
    fn desired_salary_bounds() {
        assert_eq!(
            DesiredSalary::Range { min: 400.0, max: 600.0 }.bounds(),
            (400.0, Some(600.0))
        );
        assert_eq!(DesiredSalary::Minimum { amount: 500.0 }.bounds(), (500.0, None));
        assert_eq!(
            DesiredSalary::Exact { amount: 550.0 }.bounds(),
            (550.0, Some(550.0))
        );
    }

    #[test]
    fn salary_range_validity() {
        assert!(SalaryRange { min: 400.0, max: 600.0 }.is_valid());
        assert!(SalaryRange { min: 500.0, max: 500.0 }.is_valid());
        assert!(!SalaryRange { min: 700.0, max: 600.0 }.is_valid());
        assert!(!SalaryRange { min: f64::NAN, max: 600.0 }.is_valid());
    }
}
