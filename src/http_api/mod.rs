use std::net::SocketAddr;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{RequestError, ScheduleRequest, Task};

/// Body returned by `POST /schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    Internal(String),
}

impl From<RequestError> for ApiError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Schedule(err) if err.is_configuration() => {
                ApiError::Invalid(err.to_string())
            }
            RequestError::Malformed(err) => ApiError::Invalid(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        warn!(status = %status, error = %error, "schedule request failed");
        let body = ScheduleResponse {
            success: false,
            message: "Failed to generate schedule".to_string(),
            schedule: None,
            error: Some(error),
        };
        (status, Json(body)).into_response()
    }
}

/// Routes are stateless: every request builds its own schedule.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", post(generate_schedule))
}

pub async fn serve(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router()).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// Raw body so malformed payloads get the same 400 envelope as invalid dates.
async fn generate_schedule(body: String) -> Result<Json<ScheduleResponse>, ApiError> {
    let request = ScheduleRequest::from_json(&body)?;
    let tasks = request.generate()?;
    Ok(Json(ScheduleResponse {
        success: true,
        message: "Schedule generated successfully".to_string(),
        schedule: Some(tasks),
        error: None,
    }))
}
