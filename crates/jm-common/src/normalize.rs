use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{CandidateProfile, DesiredSalary, skill_normalizer::nfkc_lower_trim};

const UNCATEGORIZED: &str = "uncategorized";
const YEN_PER_MAN_YEN: f64 = 10_000.0;

/// Extracted-candidate record as delivered by the resume extraction step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub experience_years: Option<f64>,
    #[serde(default, alias = "desired_locations", deserialize_with = "null_as_default")]
    pub desired_location: Vec<String>,
    #[serde(default)]
    pub desired_salary: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_preferences: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub industries: Vec<String>,
}

/// Extraction output writes `null` for fields it could not fill.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedSalaryError {
    #[error("desired_salary must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("desired_salary has no type")]
    MissingKind,
    #[error("unknown desired_salary type: {0}")]
    UnknownKind(String),
    #[error("unknown desired_salary unit: {0}")]
    UnknownUnit(String),
    #[error("desired_salary.{0} is missing or not a number")]
    MissingAmount(&'static str),
    #[error("desired_salary.{field} is negative: {value}")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("desired_salary range is inverted: {min} > {max}")]
    InvertedRange { min: f64, max: f64 },
}

/// Lenient normalization result. `warnings` lists every recovered field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedProfile {
    pub profile: CandidateProfile,
    pub warnings: Vec<String>,
}

/// Normalize a raw profile, dropping a malformed salary instead of failing.
pub fn normalize(raw: &RawProfile) -> NormalizedProfile {
    let mut warnings = Vec::new();

    let desired_salary = match parse_desired_salary(&raw.desired_salary) {
        Ok(salary) => salary,
        Err(err) => {
            warnings.push(format!("desired_salary dropped: {err}"));
            None
        }
    };

    let profile = build_profile(raw, desired_salary, &mut warnings);
    NormalizedProfile { profile, warnings }
}

/// Same as [`normalize`] but a malformed salary is an error.
pub fn normalize_strict(raw: &RawProfile) -> Result<CandidateProfile, MalformedSalaryError> {
    try_normalize(raw).map(|normalized| normalized.profile)
}

/// Strict salary handling that still reports the other recovered fields.
pub fn try_normalize(raw: &RawProfile) -> Result<NormalizedProfile, MalformedSalaryError> {
    let desired_salary = parse_desired_salary(&raw.desired_salary)?;
    let mut warnings = Vec::new();
    let profile = build_profile(raw, desired_salary, &mut warnings);
    Ok(NormalizedProfile { profile, warnings })
}

fn build_profile(
    raw: &RawProfile,
    desired_salary: Option<DesiredSalary>,
    warnings: &mut Vec<String>,
) -> CandidateProfile {
    CandidateProfile {
        id: raw.id,
        skills: merge_skill_categories(&raw.skills),
        experience_years: normalize_experience(raw.experience_years, warnings),
        desired_locations: raw
            .desired_location
            .iter()
            .map(|loc| loc.trim())
            .filter(|loc| !loc.is_empty())
            .map(str::to_string)
            .collect(),
        desired_salary,
        work_preferences: lowered_set(&raw.work_preferences),
        industries: lowered_set(&raw.industries),
    }
}

fn merge_skill_categories(raw: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, BTreeSet<String>> {
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (category, skills) in raw {
        let key = nfkc_lower_trim(category);
        let key = if key.is_empty() { UNCATEGORIZED.to_string() } else { key };

        let tokens = skills
            .iter()
            .map(|skill| nfkc_lower_trim(skill))
            .filter(|skill| !skill.is_empty());
        merged.entry(key).or_default().extend(tokens);
    }

    merged.retain(|_, skills| !skills.is_empty());
    merged
}

fn normalize_experience(years: Option<f64>, warnings: &mut Vec<String>) -> Option<u32> {
    let years = years?;
    if !years.is_finite() || years < 0.0 {
        warnings.push(format!("experience_years treated as unknown: {years}"));
        return None;
    }
    Some(years.floor().min(u32::MAX as f64) as u32)
}

fn lowered_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| nfkc_lower_trim(value))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Coerce the loosely typed salary object into one of the three kinds.
///
/// `null` and `{}` mean "not stated" and yield `Ok(None)`. Amounts are
/// returned in 万円; `unit: "yen"` amounts are converted.
pub fn parse_desired_salary(value: &Value) -> Result<Option<DesiredSalary>, MalformedSalaryError> {
    let object = match value {
        Value::Null => return Ok(None),
        Value::Object(object) if object.is_empty() => return Ok(None),
        Value::Object(object) => object,
        Value::Bool(_) => return Err(MalformedSalaryError::NotAnObject("boolean")),
        Value::Number(_) => return Err(MalformedSalaryError::NotAnObject("number")),
        Value::String(_) => return Err(MalformedSalaryError::NotAnObject("string")),
        Value::Array(_) => return Err(MalformedSalaryError::NotAnObject("array")),
    };

    let kind = object
        .get("type")
        .or_else(|| object.get("kind"))
        .and_then(Value::as_str)
        .map(nfkc_lower_trim)
        .ok_or(MalformedSalaryError::MissingKind)?;
    let scale = unit_scale(object)?;

    match kind.as_str() {
        "range" => {
            let min = amount(object, &["min_amount", "min"], "min_amount")? / scale;
            let max = amount(object, &["max_amount", "max"], "max_amount")? / scale;
            if min > max {
                return Err(MalformedSalaryError::InvertedRange { min, max });
            }
            Ok(Some(DesiredSalary::Range { min, max }))
        }
        "minimum" => {
            let amount = amount(object, &["amount", "min_amount"], "amount")? / scale;
            Ok(Some(DesiredSalary::Minimum { amount }))
        }
        "exact" => {
            let amount = amount(object, &["amount"], "amount")? / scale;
            Ok(Some(DesiredSalary::Exact { amount }))
        }
        _ => Err(MalformedSalaryError::UnknownKind(kind)),
    }
}

fn unit_scale(object: &Map<String, Value>) -> Result<f64, MalformedSalaryError> {
    let Some(unit) = object.get("unit") else {
        return Ok(1.0);
    };
    let unit = unit.as_str().map(nfkc_lower_trim).unwrap_or_default();

    match unit.as_str() {
        "man_yen" | "万円" | "万" => Ok(1.0),
        "yen" | "円" | "jpy" => Ok(YEN_PER_MAN_YEN),
        _ => Err(MalformedSalaryError::UnknownUnit(unit)),
    }
}

fn amount(
    object: &Map<String, Value>,
    keys: &[&str],
    field: &'static str,
) -> Result<f64, MalformedSalaryError> {
    let value = keys
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(|value| match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|value| value.is_finite())
        .ok_or(MalformedSalaryError::MissingAmount(field))?;

    if value < 0.0 {
        return Err(MalformedSalaryError::NegativeAmount { field, value });
    }
    Ok(value)
}
