pub mod legacy;
pub mod models;
pub mod portfolio;
pub mod visitors;

// Re-exports
pub use models::*;

use crate::config::StaticConfig;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, get_service},
    Json, Router,
};
use chrono::Utc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::error;

/// Build the application router.
///
/// `GET /` serves the index document; any path no route claims is looked
/// up in the public directory.
pub fn router(state: AppState, static_files: &StaticConfig) -> Router {
    Router::new()
        .route("/", get_service(ServeFile::new(&static_files.index_file)))
        .route("/api/health", get(health_handler))
        .merge(portfolio::routes())
        .merge(visitors::routes())
        .merge(legacy::routes())
        .fallback_service(ServeDir::new(&static_files.public_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// Health handler (simple, keep here)
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                database: "Connected".to_string(),
                error: None,
                timestamp: Utc::now(),
            }),
        ),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "Error".to_string(),
                    database: "Disconnected".to_string(),
                    error: Some(e.to_string()),
                    timestamp: Utc::now(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedConfig;
    use crate::storage::{ensure_profile, MemoryStore, ProfileStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use axum::response::Response;
    use chrono::{DateTime, Duration};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tempfile::{tempdir, TempDir};

    struct TestApp {
        router: Router,
        store: Arc<MemoryStore>,
        _site: TempDir,
    }

    /// Index document plus a public dir with one stylesheet
    fn static_fixture() -> (TempDir, StaticConfig) {
        let site = tempdir().unwrap();
        let public_dir = site.path().join("public");
        std::fs::create_dir_all(&public_dir).unwrap();
        std::fs::write(site.path().join("index.html"), "<h1>Portfolio</h1>").unwrap();
        std::fs::write(public_dir.join("style.css"), "body { margin: 0; }").unwrap();

        let config = StaticConfig {
            public_dir,
            index_file: site.path().join("index.html"),
        };
        (site, config)
    }

    fn test_app() -> TestApp {
        let store = Arc::new(MemoryStore::new());
        let state = AppState { store: store.clone() };
        let (site, static_files) = static_fixture();
        TestApp {
            router: router(state, &static_files),
            store,
            _site: site,
        }
    }

    async fn seeded_app() -> TestApp {
        let app = test_app();
        ensure_profile(app.store.as_ref(), SeedConfig::default().to_profile(Utc::now()))
            .await
            .unwrap();
        app
    }

    impl TestApp {
        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
            let mut request = Request::builder().method(method).uri(uri);
            let body = match body {
                Some(body) => {
                    request = request.header("content-type", "application/json");
                    Body::from(body.to_string())
                }
                None => Body::empty(),
            };

            self.router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap()
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            let response = self.send(Method::GET, uri, None).await;
            (response.status(), response_json(response).await)
        }

        async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            let response = self.send(Method::POST, uri, Some(body)).await;
            (response.status(), response_json(response).await)
        }
    }

    async fn response_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn response_json(response: Response) -> Value {
        let body = response_text(response).await;
        serde_json::from_str(&body).unwrap_or_else(|e| panic!("body is not JSON: {e}; body={body}"))
    }

    #[tokio::test]
    async fn portfolio_missing_before_seeding() {
        let app = test_app();
        let (status, body) = app.get("/api/portfolio").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Portfolio not found");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn portfolio_returns_seeded_document() {
        let app = seeded_app().await;
        let (status, body) = app.get("/api/portfolio").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "main");
        let fields = [
            "name", "title", "location", "email", "bio", "experience", "createdAt", "updatedAt",
        ];
        for field in fields {
            assert!(body[field].is_string(), "missing {field}");
        }
        assert!(body["skills"].is_array());
        assert_eq!(body["projects"], json!([]));
    }

    #[tokio::test]
    async fn update_profile_is_partial() {
        let app = seeded_app().await;
        let (_, before) = app.get("/api/portfolio").await;

        let (status, body) = app.post("/api/update-profile", json!({ "title": "X" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["updatedAt"].is_string());

        let (_, after) = app.get("/api/portfolio").await;
        assert_eq!(after["title"], "X");
        assert_eq!(after["name"], before["name"]);
        assert_eq!(after["skills"], before["skills"]);
        assert_eq!(after["bio"], before["bio"]);
        assert_eq!(after["createdAt"], before["createdAt"]);
        assert_eq!(after["updatedAt"], body["updatedAt"]);
    }

    #[tokio::test]
    async fn update_reports_stored_timestamp_when_clock_lags() {
        let app = test_app();
        let created_at = Utc::now() + Duration::hours(1);
        app.store
            .insert_profile_if_absent(SeedConfig::default().to_profile(created_at))
            .await
            .unwrap();

        let (status, body) = app.post("/api/update-profile", json!({ "bio": "Later" })).await;
        assert_eq!(status, StatusCode::OK);

        let reported: DateTime<Utc> = serde_json::from_value(body["updatedAt"].clone()).unwrap();
        let stored = app.store.find_profile().await.unwrap().unwrap();
        assert_eq!(reported, stored.updated_at);
        assert_eq!(reported, created_at);
    }

    #[tokio::test]
    async fn update_profile_replaces_skills() {
        let app = seeded_app().await;
        let (status, _) = app
            .post("/api/update-profile", json!({ "skills": ["Rust", "SQL"] }))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, profile) = app.get("/api/portfolio").await;
        assert_eq!(profile["skills"], json!(["Rust", "SQL"]));
    }

    #[tokio::test]
    async fn update_without_profile_is_not_found() {
        let app = test_app();
        let (status, body) = app.post("/api/update-profile", json!({ "name": "Nobody" })).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Profile not found or no changes made");
    }

    #[tokio::test]
    async fn adding_projects_appends() {
        let app = seeded_app().await;

        let (status, first) = app
            .post("/api/projects", json!({ "name": "Blog", "description": "Static site" }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["success"], true);
        assert_eq!(first["project"]["name"], "Blog");
        assert_eq!(first["project"]["description"], "Static site");
        assert!(first["project"]["createdAt"].is_string());

        let (_, second) = app
            .post("/api/projects", json!({ "name": "Shop", "description": "Storefront" }))
            .await;
        assert_ne!(first["project"]["id"], second["project"]["id"]);

        let (_, profile) = app.get("/api/portfolio").await;
        let projects = profile["projects"].as_array().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0]["id"], first["project"]["id"]);
        assert_eq!(projects[1]["id"], second["project"]["id"]);
    }

    #[tokio::test]
    async fn project_without_description_defaults_to_empty() {
        let app = seeded_app().await;
        let (status, body) = app.post("/api/projects", json!({ "name": "Notes" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["project"]["description"], "");
    }

    #[tokio::test]
    async fn project_without_name_is_rejected() {
        let app = seeded_app().await;
        let (status, body) = app
            .post("/api/projects", json!({ "description": "No name" }))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Project name cannot be empty");

        let (_, profile) = app.get("/api/portfolio").await;
        assert_eq!(profile["projects"], json!([]));
    }

    #[tokio::test]
    async fn project_is_reported_even_without_profile() {
        let app = test_app();
        let (status, body) = app.post("/api/projects", json!({ "name": "Lost" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["project"]["name"], "Lost");
        assert!(app.store.find_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn visitor_count_increases_in_sequence() {
        let app = test_app();
        for expected in 1..=5 {
            let (status, body) = app.get("/api/visitor-count").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["visitorCount"], expected);
        }
    }

    #[tokio::test]
    async fn visitor_count_falls_back_when_store_fails() {
        let app = test_app();
        app.get("/api/visitor-count").await;
        app.get("/api/visitor-count").await;
        app.store.disconnect();

        let (status, body) = app.get("/api/visitor-count").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["visitorCount"], 1);
    }

    #[tokio::test]
    async fn health_reports_connectivity() {
        let app = test_app();
        let (status, body) = app.get("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["database"], "Connected");
        assert!(body["timestamp"].is_string());
        assert!(body.get("error").is_none());

        app.store.disconnect();
        let (status, body) = app.get("/api/health").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "Error");
        assert_eq!(body["database"], "Disconnected");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_a_generic_500() {
        let app = seeded_app().await;
        app.store.disconnect();

        let (status, body) = app.get("/api/portfolio").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");

        let (status, _) = app.post("/api/update-profile", json!({ "title": "X" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn seeding_twice_keeps_one_profile() {
        let app = seeded_app().await;
        app.post("/api/update-profile", json!({ "name": "Kept" })).await;

        let seed = SeedConfig::default().to_profile(Utc::now());
        let inserted = ensure_profile(app.store.as_ref(), seed).await.unwrap();
        assert!(!inserted);

        let (_, profile) = app.get("/api/portfolio").await;
        assert_eq!(profile["name"], "Kept");
    }

    #[tokio::test]
    async fn legacy_update_echoes_query() {
        let app = test_app();
        let (status, body) = app.get("/api/update?name=Ada&title=Analyst").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updatedData"]["name"], "Ada");
        assert_eq!(body["updatedData"]["title"], "Analyst");

        let (_, body) = app.get("/api/update").await;
        assert_eq!(body["updatedData"]["name"], "Updated Name");
        assert_eq!(body["updatedData"]["title"], "Updated Title");
    }

    #[tokio::test]
    async fn legacy_data_has_random_count_in_range() {
        let app = test_app();
        let (status, body) = app.get("/api/data").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello from the portfolio server!");
        assert_eq!(body["serverStatus"], "Running smoothly");

        let count = body["visitorCount"].as_u64().unwrap();
        assert!((1..=1000).contains(&count));
    }

    #[tokio::test]
    async fn serves_static_files() {
        let app = test_app();

        let response = app.send(Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_text(response).await, "<h1>Portfolio</h1>");

        let response = app.send(Method::GET, "/style.css", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_text(response).await, "body { margin: 0; }");

        let response = app.send(Method::GET, "/missing.js", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
