use crate::api::models::*;
use crate::storage::{Document, ProfileUpdate, Project};
use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{info, warn};

pub async fn get_portfolio_handler(
    State(state): State<AppState>,
) -> Result<Json<Document>, AppError> {
    let profile = state
        .store
        .find_profile()
        .await
        .map_err(|e| AppError::Internal(format!("Fetch portfolio failed: {}", e)))?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

    Ok(Json(Document::Profile(profile)))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let now = Utc::now();

    let outcome = state
        .store
        .update_profile(update, now)
        .await
        .map_err(|e| AppError::Internal(format!("Update profile failed: {}", e)))?;

    let updated_at = match outcome.updated_at {
        Some(updated_at) if outcome.matched && outcome.modified => updated_at,
        _ => {
            return Err(AppError::NotFound(
                "Profile not found or no changes made".to_string(),
            ));
        }
    };

    info!(%updated_at, "Profile updated");

    Ok(Json(UpdateProfileResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        updated_at,
    }))
}

pub async fn add_project_handler(
    State(state): State<AppState>,
    Json(request): Json<AddProjectRequest>,
) -> Result<Json<AddProjectResponse>, AppError> {
    // Validate
    request.validate().map_err(AppError::BadRequest)?;

    let now = Utc::now();
    let project = Project::new(request.name, request.description, now);

    let matched = state
        .store
        .push_project(project.clone(), now)
        .await
        .map_err(|e| AppError::Internal(format!("Add project failed: {}", e)))?;

    if matched {
        info!(project_id = %project.id, "Project added");
    } else {
        warn!(project_id = %project.id, "Project not stored: no profile document");
    }

    Ok(Json(AddProjectResponse {
        success: true,
        message: "Project added successfully".to_string(),
        project,
    }))
}
