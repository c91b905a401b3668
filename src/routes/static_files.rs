//! Static File Serving
//!
//! Serves the browser frontend (markup, styles, script) from `STATIC_DIR`.
//! Anything not matched by an API route falls through to this directory.

use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// Create router for serving static files
pub fn router(static_dir: &str) -> Router {
    let path = Path::new(static_dir);
    if path.is_dir() {
        info!(path = %path.display(), "Serving static files");
    } else {
        warn!(path = %path.display(), "Static files directory not found, frontend will 404");
    }

    Router::new().fallback_service(ServeDir::new(path).append_index_html_on_directories(true))
}
