use super::scoring::{ComponentScore, MatchStatus};
use crate::{CandidateProfile, JobOpening, skill_normalizer::nfkc_lower_trim};

/// Location fit: all-or-nothing.
///
/// Full credit when a desired location is a case-insensitive substring of the
/// job location (`東京` matches `東京都渋谷区`), or when the seeker prefers
/// remote work.
pub fn evaluate_location(
    profile: &CandidateProfile,
    job: &JobOpening,
    max_points: f64,
) -> ComponentScore {
    let job_location = nfkc_lower_trim(&job.company.location);

    let matched = profile.desired_locations.iter().find(|desired| {
        let desired = nfkc_lower_trim(desired);
        !desired.is_empty() && job_location.contains(&desired)
    });

    if let Some(desired) = matched {
        return ComponentScore {
            points: max_points,
            max_points,
            status: MatchStatus::PerfectMatch,
            details: format!(
                "希望勤務地「{}」と勤務地「{}」が一致",
                desired, job.company.location
            ),
        };
    }

    if profile.prefers_remote() {
        let preference = profile
            .work_preferences
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("、");
        return ComponentScore {
            points: max_points,
            max_points,
            status: MatchStatus::Match,
            details: format!(
                "リモート勤務希望（{}）のため勤務地「{}」を許容",
                preference, job.company.location
            ),
        };
    }

    if profile.desired_locations.is_empty() {
        return ComponentScore {
            points: 0.0,
            max_points,
            status: MatchStatus::Unknown,
            details: "希望勤務地が未設定のため加点なし".into(),
        };
    }

    ComponentScore {
        points: 0.0,
        max_points,
        status: MatchStatus::Miss,
        details: format!(
            "希望勤務地（{}）と勤務地「{}」が不一致",
            profile
                .desired_locations
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("、"),
            job.company.location
        ),
    }
}
