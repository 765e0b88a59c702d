use crate::api::models::AppState;
use crate::api::portfolio::handlers::{
    add_project_handler, get_portfolio_handler, update_profile_handler,
};
use axum::{
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/portfolio", get(get_portfolio_handler))
        .route("/api/update-profile", post(update_profile_handler))
        .route("/api/projects", post(add_project_handler))
}
