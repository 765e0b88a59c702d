use crate::api::models::*;
use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{debug, error};

/// Count a visit. Falls back to 1 when the store fails.
pub async fn visitor_count_handler(State(state): State<AppState>) -> Json<VisitorCountResponse> {
    let visitor_count = match state.store.increment_visitors(Utc::now()).await {
        Ok(count) => {
            debug!(count, "Visitor counted");
            count
        }
        Err(e) => {
            error!(error = %e, "Visitor counter failed, reporting fallback");
            1
        }
    };

    Json(VisitorCountResponse { visitor_count })
}
