//! Minimal stand-in for the job board backend, served on an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const SESSION: &str = "session-abc";
pub const CSRF: &str = "csrf-xyz";

#[derive(Debug, Clone)]
pub struct RecordedApplication {
    pub job_id: String,
    pub csrf_header: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
struct StubData {
    jobs: HashMap<String, Value>,
    applied: Vec<String>,
    profile: Option<Value>,
    applications: Vec<RecordedApplication>,
}

#[derive(Debug, Clone, Default)]
pub struct StubBackend {
    data: Arc<Mutex<StubData>>,
}

impl StubBackend {
    pub fn with_job(self, job: Value) -> Self {
        let id = job["id"].as_str().expect("job id").to_string();
        self.data.lock().expect("stub mutex").jobs.insert(id, job);
        self
    }

    pub fn with_applied(self, ids: &[&str]) -> Self {
        self.data.lock().expect("stub mutex").applied =
            ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_profile(self, profile: Value) -> Self {
        self.data.lock().expect("stub mutex").profile = Some(profile);
        self
    }

    pub fn applications(&self) -> Vec<RecordedApplication> {
        self.data.lock().expect("stub mutex").applications.clone()
    }

    /// Serves the stub and returns its API base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/v1/jobs/applied-jobs", get(applied_jobs))
            .route("/api/v1/jobs/:job_id", get(job))
            .route("/api/v1/jobs/:job_id/apply", post(apply))
            .route("/api/v1/auth/profile", get(profile))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend serves");
        });
        format!("http://{addr}/api/v1")
    }
}

pub fn posting(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Backend Engineer",
        "description": "Build the matching service",
        "requirements": "Rust, PostgreSQL",
        "locationState": "st-or",
        "locationCity": "Portland",
        "locationStateRef": { "name": "Oregon" },
        "salaryMin": 110000,
        "salaryMax": 150000,
        "createdAt": "2025-05-02T12:00:00Z",
        "employer": { "companyName": "Acme", "companyDescription": "Tools" },
        "category": { "name": "Engineering" },
        "applicationSteps": ["personal_info", "technical_assessment", "review_submit"]
    })
}

pub fn profile_json() -> Value {
    json!({
        "id": "profile-1",
        "userId": "user-1",
        "role": "job_seeker",
        "name": "Jane Doe",
        "email": "jane@x.com",
        "phone": "(555) 123-4567",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    })
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authenticated(headers: &HeaderMap) -> bool {
    cookie(headers, "session").as_deref() == Some(SESSION)
}

async fn job(State(stub): State<StubBackend>, Path(job_id): Path<String>) -> Response {
    let data = stub.data.lock().expect("stub mutex");
    match data.jobs.get(&job_id) {
        Some(job) => Json(job.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Job not found"),
    }
}

async fn applied_jobs(State(stub): State<StubBackend>, headers: HeaderMap) -> Response {
    if !authenticated(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let data = stub.data.lock().expect("stub mutex");
    Json(json!(data.applied)).into_response()
}

async fn apply(
    State(stub): State<StubBackend>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authenticated(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let csrf_header = headers
        .get("x-csrf-token")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    if csrf_header.is_none() || csrf_header != cookie(&headers, "csrf") {
        return detail(StatusCode::FORBIDDEN, "CSRF token missing or invalid");
    }

    let mut data = stub.data.lock().expect("stub mutex");
    if !data.jobs.contains_key(&job_id) {
        return detail(StatusCode::NOT_FOUND, "Job not found");
    }
    if data.applied.contains(&job_id) {
        return detail(
            StatusCode::BAD_REQUEST,
            "You have already applied to this job posting",
        );
    }

    data.applied.push(job_id.clone());
    data.applications.push(RecordedApplication {
        job_id: job_id.clone(),
        csrf_header,
        body: body.clone(),
    });
    let id = format!("application-{}", data.applications.len());
    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "jobPostingId": job_id,
            "jobSeekerId": "profile-1",
            "status": "applied",
            "coverLetter": body["cover_letter"],
            "appliedAt": "2025-05-03T08:00:00Z",
            "updatedAt": "2025-05-03T08:00:00Z"
        })),
    )
        .into_response()
}

async fn profile(State(stub): State<StubBackend>, headers: HeaderMap) -> Response {
    if !authenticated(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let data = stub.data.lock().expect("stub mutex");
    match &data.profile {
        Some(profile) => Json(profile.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Profile not found"),
    }
}
