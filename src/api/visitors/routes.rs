use crate::api::models::AppState;
use crate::api::visitors::handlers::visitor_count_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/visitor-count", get(visitor_count_handler))
}
