use crate::api::legacy::handlers::{data_handler, update_handler};
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/data", get(data_handler))
        .route("/api/update", get(update_handler))
}
