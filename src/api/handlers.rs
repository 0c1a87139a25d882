//! HTTP handlers for job submission, polling and health

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::backend::RenderRequest;
use crate::jobs::{JobId, RegistryStats};
use crate::AppState;

/// Frontend served on `GET /`
pub const FRONTEND_HTML: &str = include_str!("../../static/index.html");

/// Body returned by `POST /`
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job: String,
}

/// Body returned by `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub jobs: RegistryStats,
}

/// `GET /` serves the frontend; `GET /?job=<id>` reports that job's status.
///
/// The method router also sends HEAD here, which is refused.
pub async fn index_or_status(
    method: Method,
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if method != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    match first_job_param(&params) {
        Some(job) => {
            let job_id = JobId::from(job);
            let status = state.registry.status(&job_id);
            debug!(job = %job_id, complete = status.is_complete(), "Job polled");
            Json(status).into_response()
        }
        None => Html(FRONTEND_HTML).into_response(),
    }
}

/// `POST /` registers a sweep and returns its job id without waiting on it.
///
/// A body that isn't a valid request is swept as the all-zero request.
pub async fn submit_job(State(state): State<Arc<AppState>>, body: Bytes) -> Json<SubmitResponse> {
    let request = parse_request(&body);
    let job_id = state.dispatcher.submit(request);
    Json(SubmitResponse {
        job: job_id.to_string(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        jobs: state.registry.stats(),
    })
}

/// First `job` value of the query string; later repeats are ignored
fn first_job_param(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "job")
        .map(|(_, value)| value.as_str())
}

fn parse_request(body: &[u8]) -> RenderRequest {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!(error = %e, "Unparseable render request, using zero values");
        RenderRequest::default()
    })
}
