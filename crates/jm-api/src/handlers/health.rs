use std::sync::atomic::Ordering;

use axum::{Json, extract::State};
use serde_json::json;
use tokio::time::{Duration, timeout};

use crate::SharedState;
use crate::error::ApiError;

const READINESS_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readyz(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable("shutting_down".into()));
    }

    let openings = timeout(READINESS_TIMEOUT, state.job_index.list_openings())
        .await
        .map_err(|_| ApiError::ServiceUnavailable("job_source_timeout".into()))??;

    Ok(Json(json!({
        "status": "ok",
        "job_source": state.job_index.name(),
        "openings": openings.len(),
        "application": state.config.log.service,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readyz_rejects_when_readiness_disabled() {
        let state = crate::test_state("test-key");
        state.readiness.store(false, Ordering::SeqCst);

        match readyz(State(state)).await {
            Err(ApiError::ServiceUnavailable(code)) => assert!(code.contains("shutting_down")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn readyz_reports_job_source() {
        let Json(body) = readyz(State(crate::test_state("test-key"))).await.unwrap();
        assert_eq!(body["job_source"], "memory");
        assert_eq!(body["openings"], 5);
    }
}
