use crate::{CandidateProfile, JobOpening, skill_normalizer::nfkc_lower_trim};

/// Industry fit carries no points; it only backs a reason when fewer than two
/// scored components contributed.
///
/// Matches when a desired industry and the company's industry contain one
/// another after NFKC folding (`it` matches `IT・ソフトウェア`).
pub fn industry_fit(profile: &CandidateProfile, job: &JobOpening) -> Option<String> {
    let company_industry = nfkc_lower_trim(&job.company.industry);
    if company_industry.is_empty() {
        return None;
    }

    profile
        .industries
        .iter()
        .map(|desired| nfkc_lower_trim(desired))
        .find(|desired| {
            !desired.is_empty()
                && (company_industry.contains(desired.as_str()) || desired.contains(&company_industry))
        })
        .map(|_| format!("{}分野への転職希望と合致", job.company.industry))
}
