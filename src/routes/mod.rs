//! HTTP Routes
//!
//! - `/summarize`, `/api/summarize` - PDF upload and summary relay
//! - `/api/health` - Health check
//! - `/` - Static file serving (frontend)

pub mod health;
pub mod static_files;
pub mod summarize;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
///
/// API routes take precedence over static files.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();
    let static_dir = state.config.server.static_dir.clone();

    let router = Router::new()
        .merge(summarize::router(state.clone()))
        .merge(health::router(state))
        .merge(static_files::router(&static_dir))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::summarizer::testing::RecordingProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_route_is_mounted() {
        let app = create_router(test_state(RecordingProvider::ok()));
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "recording-model");
    }

    #[tokio::test]
    async fn test_summarize_get_is_405_through_full_router() {
        let app = create_router(test_state(RecordingProvider::ok()));
        let response = app
            .oneshot(Request::get("/api/summarize").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
