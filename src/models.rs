use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::summarizer::Summarizer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub summarizer: Arc<Summarizer>,
}

/// A file received through the `pdf` form field. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Text of a document, one entry per page in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub pages: Vec<String>,
}

impl ExtractedText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Trimmed, non-empty page texts joined with a newline.
    pub fn joined(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Provider response relayed to the caller without reshaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryResult(pub serde_json::Value);

impl SummaryResult {
    /// Text of the first part of the first candidate, if the provider sent one.
    pub fn first_candidate_text(&self) -> Option<&str> {
        self.0
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|text| text.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model: String,
}
