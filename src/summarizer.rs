//! Summarization gateway
//!
//! Extracts the uploaded document, picks the prompt and relays the
//! provider's answer. No retries; the first failure is returned.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::extraction::{extract_blocking, LopdfExtractor, TextExtractor};
use crate::llm::{GoogleAdapter, LLMAdapter};
use crate::models::{SummaryResult, UploadedDocument};
use crate::prompt::Instruction;
use crate::types::AppResult;

pub struct Summarizer {
    extractor: Arc<dyn TextExtractor>,
    provider: Arc<dyn LLMAdapter>,
    max_text_chars: usize,
}

impl Summarizer {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        provider: Arc<dyn LLMAdapter>,
        max_text_chars: usize,
    ) -> Self {
        Self {
            extractor,
            provider,
            max_text_chars,
        }
    }

    /// lopdf extraction and the Gemini adapter, as configured.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(LopdfExtractor::new()),
            Arc::new(GoogleAdapter::new(&config.llm)?),
            config.limits.max_text_chars,
        ))
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Prompt that `instruction` yields for already-extracted `text`.
    pub fn prompt_for(&self, instruction: &Instruction, text: &str) -> String {
        instruction.render(text, self.max_text_chars)
    }

    pub async fn summarize(
        &self,
        document: UploadedDocument,
        instruction: Instruction,
    ) -> AppResult<SummaryResult> {
        let size = document.size();
        let extracted = extract_blocking(Arc::clone(&self.extractor), document.bytes).await?;
        let text = extracted.joined();
        info!(
            filename = %document.filename,
            bytes = size,
            pages = extracted.page_count(),
            chars = text.chars().count(),
            "Extracted document text"
        );

        let prompt = self.prompt_for(&instruction, &text);
        self.provider.generate_content(&prompt).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::extraction::fixtures::sample_pdf;
    use crate::prompt::Tone;
    use crate::types::AppError;
    use bytes::Bytes;

    fn upload(bytes: Vec<u8>) -> UploadedDocument {
        UploadedDocument {
            filename: "hello.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from(bytes),
        }
    }

    #[tokio::test]
    async fn test_default_prompt_uses_extracted_text() {
        let provider = RecordingProvider::ok();
        let summarizer = summarizer_with(provider.clone());

        let result = summarizer
            .summarize(upload(sample_pdf(&["Hello world"])), Instruction::Default)
            .await
            .unwrap();

        assert_eq!(provider.prompts(), vec!["Summarize this document: Hello world"]);
        assert_eq!(result.first_candidate_text(), Some("A canned summary."));
    }

    #[tokio::test]
    async fn test_tone_prompt_uses_server_text() {
        let provider = RecordingProvider::ok();
        let summarizer = summarizer_with(provider.clone());

        summarizer
            .summarize(upload(sample_pdf(&["Hello world"])), Instruction::Tone(Tone::Bullet))
            .await
            .unwrap();

        assert_eq!(
            provider.prompts(),
            vec!["Summarize this document as a bullet summary: Hello world"]
        );
    }

    #[tokio::test]
    async fn test_unparseable_document_never_reaches_provider() {
        let provider = RecordingProvider::ok();
        let summarizer = summarizer_with(provider.clone());

        let err = summarizer
            .summarize(upload(b"%PDF-1.4 truncated".to_vec()), Instruction::Default)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_returned() {
        let provider = RecordingProvider::failing(503);
        let summarizer = summarizer_with(provider.clone());

        let err = summarizer
            .summarize(upload(sample_pdf(&["Hello world"])), Instruction::Default)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream { status: 503 }));
        assert_eq!(provider.prompts().len(), 1);
    }
}
