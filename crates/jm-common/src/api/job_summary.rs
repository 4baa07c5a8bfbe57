use serde::{Deserialize, Serialize};

use crate::{JobId, JobOpening};

/// 求人一覧・結果表示用のフラットな求人情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub company_name: String,
    pub industry: String,
    pub location: String,
    pub position: String,
    /// 万円
    pub salary_min: f64,
    /// 万円
    pub salary_max: f64,
    pub required_skills: Vec<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
}

impl From<&JobOpening> for JobSummary {
    fn from(job: &JobOpening) -> Self {
        Self {
            job_id: job.id,
            company_name: job.company.name.clone(),
            industry: job.company.industry.clone(),
            location: job.company.location.clone(),
            position: job.position.clone(),
            salary_min: job.salary_range.min,
            salary_max: job.salary_range.max,
            required_skills: job.required_skills.iter().cloned().collect(),
            requirements: job.requirements.clone(),
            benefits: job.benefits.clone(),
        }
    }
}
