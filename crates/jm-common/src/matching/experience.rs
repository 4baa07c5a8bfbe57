use super::scoring::{ComponentScore, MatchStatus};
use crate::{JobOpening, skill_normalizer::nfkc_lower_trim};

/// Title keyword → implied minimum years. The highest matching rule wins;
/// titles with no keyword imply 0 years.
pub const SENIORITY_RULES: &[(&str, u32)] = &[
    ("intern", 0),
    ("インターン", 0),
    ("junior", 0),
    ("ジュニア", 0),
    ("mid-level", 3),
    ("mid level", 3),
    ("ミドル", 3),
    ("senior", 5),
    ("シニア", 5),
    ("manager", 5),
    ("マネージャー", 5),
    ("lead", 7),
    ("リード", 7),
    ("staff", 7),
    ("principal", 7),
    ("プリンシパル", 7),
];

pub fn implied_min_experience(position: &str) -> u32 {
    let title = nfkc_lower_trim(position);
    SENIORITY_RULES
        .iter()
        .filter(|(keyword, _)| title.contains(*keyword))
        .map(|(_, years)| *years)
        .max()
        .unwrap_or(0)
}

/// Experience fit with tiered credit above the implied minimum.
///
/// Unknown experience contributes nothing and is never penalized below zero.
pub fn evaluate_experience(
    experience_years: Option<u32>,
    job: &JobOpening,
    max_points: f64,
    buffer_years: f64,
) -> ComponentScore {
    let required = implied_min_experience(&job.position);

    let Some(actual_years) = experience_years else {
        return ComponentScore {
            points: 0.0,
            max_points,
            status: MatchStatus::Unknown,
            details: "経験年数が不明のため加点なし".into(),
        };
    };

    let actual = actual_years as f64;
    let min = required as f64;
    let buffer = buffer_years.max(0.0);

    let (fraction, status) = if actual >= min + buffer * 4.0 {
        (1.0, MatchStatus::PerfectMatch)
    } else if actual >= min + buffer * 2.0 {
        (0.9, MatchStatus::Match)
    } else if actual >= min + buffer {
        (0.8, MatchStatus::Match)
    } else if actual >= min {
        (0.7, MatchStatus::PartialMatch)
    } else {
        (0.0, MatchStatus::Miss)
    };

    let details = if fraction > 0.0 {
        format!(
            "経験{}年が「{}」の想定最低経験{}年を満たす",
            actual_years, job.position, required
        )
    } else {
        format!(
            "経験{}年が「{}」の想定最低経験{}年に未達",
            actual_years, job.position, required
        )
    };

    ComponentScore {
        points: max_points * fraction,
        max_points,
        status,
        details,
    }
}
