use std::collections::BTreeSet;

use super::scoring::{ComponentScore, MatchStatus};
use crate::JobOpening;

/// Skill overlap: |seeker ∩ required| / max(1, |required|), scaled to `max_points`.
///
/// A job without required skills is fully satisfied, since there is nothing
/// the seeker can fail to match.
pub fn evaluate_skills(
    seeker_skills: &BTreeSet<String>,
    job: &JobOpening,
    max_points: f64,
) -> ComponentScore {
    let required = job.required_skill_set();

    if required.is_empty() {
        return ComponentScore {
            points: max_points,
            max_points,
            status: MatchStatus::PerfectMatch,
            details: format!("求人「{}」に必須スキル要件なし", job.position),
        };
    }

    let matched: Vec<&String> = required.intersection(seeker_skills).collect();
    let missing: Vec<&String> = required.difference(seeker_skills).collect();
    let fraction = matched.len() as f64 / required.len().max(1) as f64;
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

    let details = if matched.is_empty() {
        format!("必須スキル不一致 (不足: {})", join(&missing))
    } else {
        format!(
            "必須スキル一致: {} ({}件中{}件)",
            join(&matched),
            required.len(),
            matched.len()
        )
    };

    ComponentScore {
        points,
        max_points,
        status,
        details,
    }
}

fn join(skills: &[&String]) -> String {
    skills
        .iter()
        .map(|skill| skill.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_requiring(skills: &[&str]) -> JobOpening {
        JobOpening {
            id: 1,
            position: "バックエンドエンジニア".into(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            ..JobOpening::default()
        }
    }

    fn seeker(skills: &[&str]) -> BTreeSet<String> {
        skills.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scales_linearly_with_overlap() {
        let job = job_requiring(&["Python", "React", "AWS", "Docker"]);

        let half = evaluate_skills(&seeker(&["python", "aws"]), &job, 40.0);
        assert_eq!(half.points, 20.0);
        assert_eq!(half.status, MatchStatus::Match);
        assert!(half.details.contains("aws, python"));
        assert!(half.details.contains("4件中2件"));

        let full = evaluate_skills(&seeker(&["python", "aws", "react", "docker"]), &job, 40.0);
        assert_eq!(full.points, 40.0);
        assert_eq!(full.status, MatchStatus::PerfectMatch);
    }

    #[test]
    fn zero_requirements_give_full_credit() {
        let job = job_requiring(&[]);

        let empty_seeker = evaluate_skills(&BTreeSet::new(), &job, 40.0);
        assert_eq!(empty_seeker.points, 40.0);

        let any_seeker = evaluate_skills(&seeker(&["cobol"]), &job, 40.0);
        assert_eq!(any_seeker.points, 40.0);
        assert!(any_seeker.details.contains("必須スキル要件なし"));
    }

    #[test]
    fn no_overlap_names_missing_skills() {
        let job = job_requiring(&["Go", "Kubernetes"]);
        let result = evaluate_skills(&seeker(&["python"]), &job, 40.0);

        assert_eq!(result.points, 0.0);
        assert_eq!(result.status, MatchStatus::Miss);
        assert!(result.details.contains("golang, kubernetes"));
    }

    #[test]
    fn adding_a_required_skill_never_decreases_points() {
        let job = job_requiring(&["python", "react", "aws"]);
        let mut skills = seeker(&["python"]);
        let before = evaluate_skills(&skills, &job, 40.0).points;

        skills.insert("react".into());
        let after = evaluate_skills(&skills, &job, 40.0).points;
        assert!(after >= before);

        skills.insert("unrelated".into());
        let unrelated = evaluate_skills(&skills, &job, 40.0).points;
        assert_eq!(unrelated, after);
    }

    #[test]
    fn job_aliases_are_canonicalized() {
        let job = job_requiring(&["K8s", "JS"]);
        let result = evaluate_skills(&seeker(&["kubernetes", "javascript"]), &job, 40.0);
        assert_eq!(result.points, 40.0);
    }
}
