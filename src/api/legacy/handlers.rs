//! Non-persistent demo endpoints kept for the old front-end.

use crate::api::models::*;
use axum::{extract::Query, Json};
use chrono::Utc;
use rand::Rng;

pub async fn data_handler() -> Json<LegacyDataResponse> {
    Json(LegacyDataResponse {
        message: "Hello from the portfolio server!".to_string(),
        timestamp: Utc::now(),
        visitor_count: rand::thread_rng().gen_range(1..=1000),
        server_status: "Running smoothly".to_string(),
    })
}

/// Echo the query back as if it had been saved
pub async fn update_handler(Query(query): Query<LegacyUpdateQuery>) -> Json<LegacyUpdateResponse> {
    Json(LegacyUpdateResponse {
        success: true,
        message: "Profile updated successfully!".to_string(),
        updated_data: LegacyProfileData {
            name: or_default(query.name, "Updated Name"),
            title: or_default(query.title, "Updated Title"),
            updated_at: Utc::now(),
        },
    })
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
