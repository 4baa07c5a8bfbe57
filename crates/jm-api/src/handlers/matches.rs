use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use chrono::Utc;
use tracing::info;

use jm_common::JobId;
use jm_common::api::{MatchListResponse, MatchRequest, MatchResponse, ScoreRequest};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;

pub async fn run_match(
    State(state): State<SharedState>,
    _auth: AuthUser,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request
        .profile_input()
        .map_err(|err| ApiError::BadRequest(format!("invalid profile: {err}")))?;
    let normalized = input.resolve(request.strict_salary)?;

    let ranked = state
        .engine
        .match_profile(state.job_index.as_ref(), &normalized.profile, request.top_n)
        .await?;

    info!(
        profile_id = ?normalized.profile.id,
        returned = ranked.len(),
        warnings = normalized.warnings.len(),
        "match request served"
    );

    Ok(Json(MatchListResponse::new(
        &ranked,
        normalized.warnings,
        Utc::now(),
    )))
}

pub async fn score_job(
    State(state): State<SharedState>,
    job_id: Result<Path<JobId>, PathRejection>,
    _auth: AuthUser,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let Path(job_id) = job_id?;
    let Json(request) = payload?;
    let input = request
        .profile_input()
        .map_err(|err| ApiError::BadRequest(format!("invalid profile: {err}")))?;
    let profile = input.into_profile(request.strict_salary)?;

    let scored = state
        .engine
        .score_single(state.job_index.as_ref(), &profile, job_id)
        .await?;

    Ok(Json(MatchResponse::from(&scored)))
}
