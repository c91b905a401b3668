use async_trait::async_trait;

use crate::models::SummaryResult;
use crate::types::AppResult;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    /// Sends one user prompt and returns the provider's response body untouched.
    async fn generate_content(&self, prompt: &str) -> AppResult<SummaryResult>;

    fn model(&self) -> &str;
}
