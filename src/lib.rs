// PDF Summarizer - upload a PDF, extract its text, relay it to Gemini for a summary

pub mod client;
pub mod config;
pub mod extraction;
pub mod lambda;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod summarizer;
pub mod types;
pub mod upload;
pub mod utils;

use std::sync::Arc;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

impl AppState {
    /// Wires the configured extractor and provider into shared state.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let summarizer = summarizer::Summarizer::from_config(&config)?;
        Ok(Self {
            config,
            summarizer: Arc::new(summarizer),
        })
    }
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
