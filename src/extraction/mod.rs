//! Text extraction
//!
//! One extraction contract shared by the server's summarize route and the
//! client session, so both sides see the same text for a given document.

pub mod pdf;

use bytes::Bytes;
use std::sync::Arc;

use crate::models::ExtractedText;
use crate::types::{AppError, AppResult};

pub use pdf::{LopdfExtractor, PageSize};

pub trait TextExtractor: Send + Sync {
    /// Text of every page, in page order.
    fn extract_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>>;

    fn extract_text(&self, bytes: &[u8]) -> AppResult<ExtractedText> {
        self.extract_pages(bytes).map(ExtractedText::new)
    }
}

/// Runs extraction on the blocking pool; PDF parsing is CPU-bound.
pub async fn extract_blocking(
    extractor: Arc<dyn TextExtractor>,
    bytes: Bytes,
) -> AppResult<ExtractedText> {
    tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
        .await
        .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))?
}
