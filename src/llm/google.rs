// Google Gemini adapter
// API Reference: https://ai.google.dev/api/generate-content
//
// The key travels in the `x-goog-api-key` header so it never shows up in
// request URLs or transport error messages.

use crate::config::LLMConfig;
use crate::llm::provider::LLMAdapter;
use crate::models::SummaryResult;
use crate::prompt::truncate_chars;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";
const LOGGED_ERROR_BODY_CHARS: usize = 512;

pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

// Request types for the generateContent endpoint
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct GoogleGenerateRequest {
    contents: Vec<GoogleContent>,
}

#[derive(Debug, Serialize, PartialEq)]
struct GoogleContent {
    role: String,
    parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize, PartialEq)]
struct GooglePart {
    text: String,
}

/// One user-role message carrying the whole prompt as a single text part.
pub(crate) fn build_payload(prompt: &str) -> GoogleGenerateRequest {
    GoogleGenerateRequest {
        contents: vec![GoogleContent {
            role: "user".to_string(),
            parts: vec![GooglePart {
                text: prompt.to_string(),
            }],
        }],
    }
}

impl GoogleAdapter {
    pub fn new(config: &LLMConfig) -> AppResult<Self> {
        if config.google_api_key.trim().is_empty() {
            return Err(AppError::Config("GOOGLE_API_KEY is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.google_api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl LLMAdapter for GoogleAdapter {
    async fn generate_content(&self, prompt: &str) -> AppResult<SummaryResult> {
        let payload = build_payload(prompt);
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Network("request timed out".to_string())
                } else {
                    AppError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate_chars(&error_text, LOGGED_ERROR_BODY_CHARS),
                "Gemini API returned an error"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::Internal(format!("Invalid response from summarization API: {}", e))
        })?;

        Ok(SummaryResult(body))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
