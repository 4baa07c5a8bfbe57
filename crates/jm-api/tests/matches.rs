use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use jm_common::job_index::{JobIndex, JobIndexError};
use jm_common::matching::ScoringConfig;
use jm_common::{JobId, JobOpening};

const KEY: &str = "test-key";

fn app() -> Router {
    jm_api::create_router(jm_api::test_state(KEY))
}

fn seeker() -> Value {
    json!({
        "id": 7,
        "skills": {
            "バックエンド": ["Python", "SQL"],
            "クラウド": ["AWS"]
        },
        "experience_years": 4,
        "desired_location": ["東京", "神奈川"],
        "desired_salary": { "type": "range", "min_amount": 500, "max_amount": 700 },
        "work_preferences": ["フレックス"]
    })
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", KEY);

    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn ids(body: &Value) -> Vec<i64> {
    body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["job_id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn ranks_demo_openings_for_a_raw_profile() {
    let (status, body) = send(app(), "POST", "/api/matches", Some(json!({ "profile": seeker() }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 1, 2]);

    let scores: Vec<u64> = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["score"].as_u64().unwrap())
        .collect();
    assert_eq!(scores, vec![100, 60, 56]);

    let best = &body["matches"][0];
    assert_eq!(best["company_name"], "株式会社データアナリティクス");
    assert_eq!(best["reasons"].as_array().map(Vec::len), Some(3));
    assert!(best["reasons"][0].as_str().unwrap().contains("python"));
    assert!(body["matched_at"].is_string());
    assert!(body.get("warnings").is_none());
}

#[tokio::test]
async fn top_n_override_and_validation() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/matches",
        Some(json!({ "profile": seeker(), "top_n": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 1, 2, 5, 4]);

    for top_n in [0, -1] {
        let (status, body) = send(
            app(),
            "POST",
            "/api/matches",
            Some(json!({ "profile": seeker(), "top_n": top_n })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }
}

#[tokio::test]
async fn malformed_salary_is_a_warning_unless_strict() {
    let mut profile = seeker();
    profile["desired_salary"] = json!({ "type": "range", "min_amount": 900, "max_amount": 500 });

    let (status, body) = send(
        app(),
        "POST",
        "/api/matches",
        Some(json!({ "profile": profile.clone() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warnings"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["matches"][0]["score_breakdown"]["salary"]["points"], 0.0);

    let (status, body) = send(
        app(),
        "POST",
        "/api/matches",
        Some(json!({ "profile": profile, "strict_salary": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("inverted"));
}

#[tokio::test]
async fn null_collections_in_raw_profile_are_empty() {
    let mut profile = seeker();
    profile["work_preferences"] = Value::Null;
    profile["industries"] = Value::Null;

    let (status, body) = send(app(), "POST", "/api/matches", Some(json!({ "profile": profile }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 1, 2]);
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    for uri in ["/api/matches", "/api/matches/1"] {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-api-key", KEY)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"profile\": "))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "bad_request");
        assert!(body["message"].as_str().unwrap().starts_with("invalid request body"));
    }

    let (status, body) = send(
        app(),
        "POST",
        "/api/matches/abc",
        Some(json!({ "profile": seeker() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn accepts_already_normalized_profiles() {
    let profile = json!({
        "skills": { "backend": ["python", "sql", "aws"] },
        "experience_years": 4,
        "desired_locations": ["東京"],
        "desired_salary": { "kind": "range", "min": 500.0, "max": 700.0 }
    });

    let (status, body) = send(
        app(),
        "POST",
        "/api/matches",
        Some(json!({ "profile": profile, "normalized": true, "top_n": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3]);
    assert_eq!(body["matches"][0]["score"], 100);
}

#[tokio::test]
async fn rescoring_a_single_opening() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/matches/4",
        Some(json!({ "profile": seeker() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_id"], 4);
    assert_eq!(body["score_breakdown"]["experience"]["points"], 0.0);
    assert_eq!(body["score_breakdown"]["skills"]["points"], 20.0);

    let (status, body) = send(
        app(),
        "POST",
        "/api/matches/99",
        Some(json!({ "profile": seeker() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn lists_and_fetches_jobs() {
    let (status, body) = send(app(), "GET", "/api/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(5));

    let (status, body) = send(app(), "GET", "/api/jobs/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["position"], "UI/UXデザイナー");
    assert_eq!(body["salary_min"], 380.0);

    let (status, _) = send(app(), "GET", "/api/jobs/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app(), "GET", "/api/jobs/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

struct UnavailableIndex;

#[async_trait]
impl JobIndex for UnavailableIndex {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn list_openings(&self) -> Result<Vec<JobOpening>, JobIndexError> {
        Err(JobIndexError::SourceUnavailable("connection refused".into()))
    }

    async fn by_id(&self, _id: JobId) -> Result<JobOpening, JobIndexError> {
        Err(JobIndexError::SourceUnavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn unavailable_source_is_service_unavailable() {
    let state = jm_api::build_state(
        jm_api::AppConfig::for_tests(KEY),
        Arc::new(UnavailableIndex),
        ScoringConfig::default(),
    );
    let app = jm_api::create_router(state);

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/matches",
        Some(json!({ "profile": seeker() })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");

    let (status, _) = send(app.clone(), "GET", "/api/jobs/1", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
