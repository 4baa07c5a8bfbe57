use super::scoring::{ComponentScore, MatchStatus};
use crate::{DesiredSalary, JobOpening};

/// Salary fit: partial credit proportional to the overlap width.
///
/// The overlap is measured against the narrower of the two ranges, so a
/// desired range that lies entirely inside the offered range (or vice versa)
/// earns full credit. Degenerate ranges that intersect also earn full credit.
pub fn evaluate_salary(
    desired: Option<&DesiredSalary>,
    job: &JobOpening,
    max_points: f64,
) -> ComponentScore {
    let Some(desired) = desired else {
        return ComponentScore {
            points: 0.0,
            max_points,
            status: MatchStatus::Unknown,
            details: "希望年収が不明のため加点なし".into(),
        };
    };

    let offered = job.salary_range;
    let offered_text = format!("{}〜{}万円", offered.min, offered.max);

    if !offered.is_valid() {
        return ComponentScore {
            points: 0.0,
            max_points,
            status: MatchStatus::Unknown,
            details: format!("提示年収{offered_text}が不正のため加点なし"),
        };
    }

    let fraction = overlap_fraction(desired, offered.min, offered.max);
    let points = max_points * fraction;

    let status = if fraction >= 1.0 {
        MatchStatus::PerfectMatch
    } else if fraction >= 0.5 {
        MatchStatus::Match
    } else if fraction > 0.0 {
        MatchStatus::PartialMatch
    } else {
        MatchStatus::Miss
    };

    let details = if fraction > 0.0 {
        format!(
            "希望年収{}と提示年収{}が重複（一致率{:.0}%）",
            desired.describe(),
            offered_text,
            fraction * 100.0
        )
    } else {
        format!(
            "希望年収{}と提示年収{}が重ならない",
            desired.describe(),
            offered_text
        )
    };

    ComponentScore {
        points,
        max_points,
        status,
        details,
    }
}

/// Fraction in [0, 1] of the narrower range covered by the intersection.
pub fn overlap_fraction(desired: &DesiredSalary, offered_min: f64, offered_max: f64) -> f64 {
    let (desired_min, desired_max) = desired.bounds();
    let desired_max = desired_max.unwrap_or(f64::INFINITY);

    let low = desired_min.max(offered_min);
    let high = desired_max.min(offered_max);
    if low > high {
        return 0.0;
    }

    let narrower = (desired_max - desired_min).min(offered_max - offered_min);
    if narrower <= 0.0 {
        return 1.0;
    }

    ((high - low) / narrower).clamp(0.0, 1.0)
}
