//! REST API server for the compliance task worker
//!
//! Exposes job dispatch over HTTP so the workflow engine (or an operator)
//! can hand jobs to the worker.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::WorkerError;
use crate::execution::JobDispatcher;
use crate::models::Job;
use crate::verification::RuleCatalogue;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobRequest {
    pub id: Option<String>,
    pub task: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TaskJobRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub dispatcher: Arc<JobDispatcher>,
    pub catalogue: Arc<RuleCatalogue>,
}

fn status_for(error: &WorkerError) -> StatusCode {
    match error {
        WorkerError::TaskNotRegistered(_) => StatusCode::NOT_FOUND,
        WorkerError::InvalidJob(_) => StatusCode::BAD_REQUEST,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn job_id(id: Option<String>) -> String {
    match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => Uuid::new_v4().to_string(),
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Task Listing
/// =============================

async fn list_tasks(State(state): State<ApiState>) -> Json<ApiResponse> {
    Json(ApiResponse::success(json!({
        "tasks": state.dispatcher.router().list(),
        "catalogue": state.catalogue.describe(),
    })))
}

/// =============================
/// Job Endpoints
/// =============================

async fn run_job(state: &ApiState, job: Job) -> (StatusCode, Json<ApiResponse>) {
    info!(job_id = %job.id, task = %job.task, "Received job request");

    match state.dispatcher.dispatch(job).await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success(result))),
        Err(e) => (
            status_for(&e),
            Json(ApiResponse::error(format!("Job failed: {}", e))),
        ),
    }
}

async fn submit_job(
    State(state): State<ApiState>,
    Json(req): Json<JobRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let job = Job::new(job_id(req.id), req.task, req.variables);
    run_job(&state, job).await
}

async fn submit_task_job(
    State(state): State<ApiState>,
    Path(task): Path<String>,
    Json(req): Json<TaskJobRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let job = Job::new(job_id(req.id), task, req.variables);
    run_job(&state, job).await
}

/// =============================
/// Router
/// =============================

pub fn create_router(dispatcher: Arc<JobDispatcher>, catalogue: Arc<RuleCatalogue>) -> Router {
    let state = ApiState {
        dispatcher,
        catalogue,
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(list_tasks))
        .route("/api/jobs", post(submit_job))
        .route("/api/jobs/:task", post(submit_task_job))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    dispatcher: Arc<JobDispatcher>,
    catalogue: Arc<RuleCatalogue>,
    port: u16,
) -> crate::Result<()> {
    let router = create_router(dispatcher, catalogue);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
