use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::{borrow::Cow, future::Future};
use thiserror::Error;
use tracing::{error, warn};

use jm_common::job_index::JobIndexError;
use jm_common::matching::{InvalidTopNError, MatchError};
use jm_common::normalize::MalformedSalaryError;

tokio::task_local! {
    static REQUEST_ID: String;
}

fn sanitize_message(message: &str) -> String {
    const MAX_LEN: usize = 240;

    let mut cleaned = message
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.chars().count() > MAX_LEN {
        cleaned = cleaned.chars().take(MAX_LEN).collect();
        cleaned.push('…');
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

pub async fn with_request_id<Fut, T>(request_id: Option<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    if let Some(request_id) = request_id {
        REQUEST_ID.scope(request_id, fut).await
    } else {
        fut.await
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|value| value.clone()).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("too many requests: {0}")]
    TooManyRequests(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let request_id = current_request_id();

        if status.is_server_error() {
            error!(
                code,
                status = %status,
                request_id = request_id.as_deref().unwrap_or(""),
                error = %self,
                "api_error"
            );
        } else {
            warn!(
                code,
                status = %status,
                request_id = request_id.as_deref().unwrap_or(""),
                error = %self,
                "api_error"
            );
        }

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
            request_id,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Config(_) => "config_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Unauthorized(_) => Cow::Borrowed("unauthorized"),
            ApiError::NotFound(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::TooManyRequests(_) => Cow::Borrowed("too many requests"),
            ApiError::ServiceUnavailable(_) => Cow::Borrowed("service unavailable"),
            ApiError::Config(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(value: MatchError) -> Self {
        match value {
            MatchError::InvalidTopN(err) => err.into(),
            MatchError::MalformedSalary(err) => err.into(),
            MatchError::NotFound(id) => ApiError::NotFound(format!("job opening {id} not found")),
            MatchError::SourceUnavailable(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

impl From<JobIndexError> for ApiError {
    fn from(value: JobIndexError) -> Self {
        MatchError::from(value).into()
    }
}

impl From<InvalidTopNError> for ApiError {
    fn from(value: InvalidTopNError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

impl From<MalformedSalaryError> for ApiError {
    fn from(value: MalformedSalaryError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(format!("invalid request body: {}", value.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::BadRequest(format!("invalid path: {}", value.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: axum::response::Response) -> (StatusCode, Value) {
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (parts.status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn includes_request_id_in_response_body_when_present() {
        let err = ApiError::Internal("boom".into());
        let response = with_request_id(Some("req-123".into()), async { err.into_response() }).await;

        let (status, json) = body_json(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["request_id"], "req-123");
        assert_eq!(json["message"], "internal server error");
    }

    #[tokio::test]
    async fn match_errors_map_to_statuses() {
        let cases = [
            (MatchError::InvalidTopN(InvalidTopNError(0)), StatusCode::BAD_REQUEST),
            (
                MatchError::MalformedSalary(MalformedSalaryError::MissingKind),
                StatusCode::BAD_REQUEST,
            ),
            (MatchError::NotFound(9), StatusCode::NOT_FOUND),
            (
                MatchError::SourceUnavailable("postgres down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = body_json(ApiError::from(err).into_response()).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn source_details_are_not_leaked() {
        let err = ApiError::from(JobIndexError::SourceUnavailable(
            "postgres://user:secret@db/jobs refused".into(),
        ));
        let (_, json) = body_json(err.into_response()).await;
        assert_eq!(json["code"], "service_unavailable");
        assert_eq!(json["message"], "service unavailable");
    }

    #[test]
    fn sanitize_redacts_urls_and_paths() {
        let cleaned = sanitize_message("failed at /etc/jobs.json via https://example.com");
        assert_eq!(cleaned, "failed at [redacted-path] via [redacted-url]");
        assert_eq!(sanitize_message("\n\t"), "unexpected error");
    }
}
