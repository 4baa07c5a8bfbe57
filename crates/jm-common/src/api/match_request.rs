use serde::Deserialize;
use serde_json::Value;

use crate::{CandidateProfile, matching::ProfileInput, normalize::RawProfile};

/// HTTPからのマッチリクエスト
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    /// 生プロフィール、または `normalized = true` なら正規化済みプロフィール
    pub profile: Value,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub top_n: Option<i64>,
    /// 不正な希望年収をエラーにする（既定: 無視して警告）
    #[serde(default)]
    pub strict_salary: bool,
}

/// 単一求人の再スコアリング
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub profile: Value,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub strict_salary: bool,
}

fn profile_input(profile: Value, normalized: bool) -> Result<ProfileInput, serde_json::Error> {
    if normalized {
        serde_json::from_value::<CandidateProfile>(profile).map(ProfileInput::Normalized)
    } else {
        serde_json::from_value::<RawProfile>(profile).map(ProfileInput::Raw)
    }
}

impl MatchRequest {
    pub fn profile_input(&self) -> Result<ProfileInput, serde_json::Error> {
        profile_input(self.profile.clone(), self.normalized)
    }
}

impl ScoreRequest {
    pub fn profile_input(&self) -> Result<ProfileInput, serde_json::Error> {
        profile_input(self.profile.clone(), self.normalized)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_to_raw_lenient_input() {
        let request: MatchRequest = serde_json::from_value(json!({
            "profile": { "skills": { "Backend": ["Python"] }, "desired_location": ["東京"] }
        }))
        .unwrap();

        assert!(!request.normalized);
        assert!(!request.strict_salary);
        assert_eq!(request.top_n, None);
        assert!(matches!(request.profile_input().unwrap(), ProfileInput::Raw(_)));
    }

    #[test]
    fn normalized_flag_selects_canonical_shape() {
        let request: MatchRequest = serde_json::from_value(json!({
            "profile": {
                "skills": { "backend": ["python"] },
                "desired_salary": { "kind": "minimum", "amount": 500.0 }
            },
            "normalized": true,
            "top_n": 5
        }))
        .unwrap();

        match request.profile_input().unwrap() {
            ProfileInput::Normalized(profile) => {
                assert_eq!(
                    profile.desired_salary,
                    Some(crate::DesiredSalary::Minimum { amount: 500.0 })
                );
            }
            other => panic!("unexpected input: {other:?}"),
        }
        assert_eq!(request.top_n, Some(5));
    }

    #[test]
    fn wrong_profile_shape_is_rejected() {
        let request: MatchRequest = serde_json::from_value(json!({
            "profile": { "skills": "python" }
        }))
        .unwrap();
        assert!(request.profile_input().is_err());
    }
}
