use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use jm_common::JobId;
use jm_common::api::JobSummary;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;

pub async fn list_jobs(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<Vec<JobSummary>>, ApiError> {
    let openings = state.job_index.list_openings().await?;
    Ok(Json(openings.iter().map(JobSummary::from).collect()))
}

pub async fn get_job(
    State(state): State<SharedState>,
    job_id: Result<Path<JobId>, PathRejection>,
    _auth: AuthUser,
) -> Result<Json<JobSummary>, ApiError> {
    let Path(job_id) = job_id?;
    let opening = state.job_index.by_id(job_id).await?;
    Ok(Json(JobSummary::from(&opening)))
}
