use crate::storage::{ProfileStore, Project};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
}

/// Request to add a project to the portfolio
#[derive(Debug, Deserialize)]
pub struct AddProjectRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Response after a profile update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

/// Response after adding a project
#[derive(Debug, Serialize)]
pub struct AddProjectResponse {
    pub success: bool,
    pub message: String,
    pub project: Project,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorCountResponse {
    pub visitor_count: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Query for the legacy update endpoint
#[derive(Debug, Deserialize)]
pub struct LegacyUpdateQuery {
    pub name: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDataResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub visitor_count: u32,
    pub server_status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUpdateResponse {
    pub success: bool,
    pub message: String,
    pub updated_data: LegacyProfileData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProfileData {
    pub name: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AddProjectRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Project name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message,
        }))
        .into_response()
    }
}
