use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use super::{ClientError, ClientResult, SelectedFile};
use crate::models::SummaryResult;
use crate::upload::{PDF_FIELD, PROMPT_FIELD};

#[async_trait]
pub trait SummaryTransport: Send + Sync {
    /// Posts the file with `prompt` and returns the first candidate's text.
    async fn request_summary(&self, file: &SelectedFile, prompt: &str) -> ClientResult<String>;
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// `server` is the service's base URL, e.g. `http://localhost:3000`.
    pub fn new(server: &str) -> Self {
        Self::with_client(Client::new(), server)
    }

    pub fn with_client(client: Client, server: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/summarize", server.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl SummaryTransport for HttpTransport {
    async fn request_summary(&self, file: &SelectedFile, prompt: &str) -> ClientResult<String> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| ClientError::InvalidResponse(format!("bad media type: {}", e)))?;
        let form = Form::new()
            .part(PDF_FIELD, part)
            .text(PROMPT_FIELD, prompt.to_string());

        debug!(endpoint = %self.endpoint, file = %file.name, "Requesting summary");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Server error.")
                .to_string();
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        SummaryResult(body)
            .first_candidate_text()
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse("response has no candidates".to_string()))
    }
}
