use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::preview::{self, PreviewPage, PREVIEW_SCALE};
use super::{ClientError, ClientResult, SelectedFile, SummaryTransport};
use crate::extraction::{extract_blocking, LopdfExtractor};
use crate::prompt::{default_prompt, tone_prompt, Tone};

pub const SUMMARY_FILE_NAME: &str = "summary.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    FileSelected,
    Previewing,
    ExtractingText,
    AwaitingSummary,
    SummaryDisplayed,
    Error,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientState::Idle => "idle",
            ClientState::FileSelected => "file selected",
            ClientState::Previewing => "previewing",
            ClientState::ExtractingText => "extracting text",
            ClientState::AwaitingSummary => "awaiting summary",
            ClientState::SummaryDisplayed => "summary displayed",
            ClientState::Error => "error",
        };
        f.write_str(name)
    }
}

/// One user's file, its extracted text and whatever summary is on screen.
pub struct ClientSession<T: SummaryTransport> {
    transport: T,
    extractor: Arc<LopdfExtractor>,
    state: ClientState,
    file: Option<SelectedFile>,
    preview: Vec<PreviewPage>,
    extracted_text: Option<String>,
    tone: Option<Tone>,
    last_prompt: Option<String>,
    summary_text: Option<String>,
    status: String,
}

impl<T: SummaryTransport> ClientSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            extractor: Arc::new(LopdfExtractor::new()),
            state: ClientState::Idle,
            file: None,
            preview: Vec::new(),
            extracted_text: None,
            tone: None,
            last_prompt: None,
            summary_text: None,
            status: String::new(),
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn preview(&self) -> &[PreviewPage] {
        &self.preview
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    /// Text currently shown in the summary area.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary_text.as_deref()
    }

    /// Loads a newly selected or dropped file and requests its default summary.
    pub async fn handle_file(&mut self, file: SelectedFile) -> ClientResult<&str> {
        if !file.is_pdf() {
            warn!(file = %file.name, media_type = %file.media_type, "Rejected non-PDF file");
            self.state = ClientState::Error;
            self.status = ClientError::UnsupportedFile.to_string();
            return Err(ClientError::UnsupportedFile);
        }

        self.reset();
        self.state = ClientState::FileSelected;
        self.status = "Processing...".to_string();
        self.file = Some(file.clone());

        self.state = ClientState::Previewing;
        match self.extractor.page_sizes(&file.bytes) {
            Ok(sizes) => self.preview = preview::layout(&sizes, PREVIEW_SCALE),
            Err(e) => warn!(file = %file.name, error = %e, "Failed to render PDF preview"),
        }

        self.state = ClientState::ExtractingText;
        let extracted = match extract_blocking(self.extractor.clone(), file.bytes.clone()).await {
            Ok(extracted) => extracted,
            Err(e) => return Err(self.fail(ClientError::Extraction(e.to_string()))),
        };
        let text = extracted.joined();
        info!(file = %file.name, pages = extracted.page_count(), "Extracted text locally");
        self.extracted_text = Some(text.clone());

        self.summarize(default_prompt(&text), "Generating summary...").await?;
        self.status = "Summary generated successfully!".to_string();
        Ok(self.summary_text.as_deref().unwrap_or_default())
    }

    /// Requests a new summary in `tone` from the previously extracted text.
    pub async fn select_tone(&mut self, tone: Tone) -> ClientResult<&str> {
        let text = self.extracted_text.clone().ok_or(ClientError::NoDocument)?;
        self.tone = Some(tone);
        self.summarize(tone_prompt(tone, &text), "Generating new summary...")
            .await
    }

    /// Re-issues the prompt of the selected tone, `concise` if none was picked.
    pub async fn regenerate(&mut self) -> ClientResult<&str> {
        let text = self.extracted_text.clone().ok_or(ClientError::NoDocument)?;
        let tone = self.tone.unwrap_or_default();
        self.summarize(tone_prompt(tone, &text), "Regenerating summary...")
            .await
    }

    pub fn copy_summary(&self) -> ClientResult<&str> {
        self.summary_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .ok_or(ClientError::NothingToExport)
    }

    /// Writes the displayed text to `summary.txt` inside `dir`.
    pub async fn download_summary(&self, dir: &Path) -> ClientResult<PathBuf> {
        let text = self.copy_summary()?;
        let path = dir.join(SUMMARY_FILE_NAME);
        tokio::fs::write(&path, text).await?;
        info!(path = %path.display(), "Summary saved");
        Ok(path)
    }

    async fn summarize(&mut self, prompt: String, pending: &str) -> ClientResult<&str> {
        let file = self.file.clone().ok_or(ClientError::NoDocument)?;

        self.state = ClientState::AwaitingSummary;
        self.summary_text = Some(pending.to_string());
        self.last_prompt = Some(prompt.clone());

        match self.transport.request_summary(&file, &prompt).await {
            Ok(summary) => {
                self.summary_text = Some(summary);
                self.state = ClientState::SummaryDisplayed;
                Ok(self.summary_text.as_deref().unwrap_or_default())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        let message = format!("Error: {}", err);
        warn!(state = %self.state, "{}", message);
        self.state = ClientState::Error;
        self.status = message.clone();
        self.summary_text = Some(message);
        err
    }

    fn reset(&mut self) {
        self.file = None;
        self.preview.clear();
        self.extracted_text = None;
        self.tone = None;
        self.last_prompt = None;
        self.summary_text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::sample_pdf;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers from a script and records every prompt it receives.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<ClientResult<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn replying(replies: Vec<ClientResult<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SummaryTransport for ScriptedTransport {
        async fn request_summary(&self, _file: &SelectedFile, prompt: &str) -> ClientResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("A summary.".to_string()))
        }
    }

    fn hello_pdf() -> SelectedFile {
        SelectedFile::new("hello.pdf", "application/pdf", sample_pdf(&["Hello world"]))
    }

    fn prompts(session: &ClientSession<ScriptedTransport>) -> Vec<String> {
        session.transport.prompts.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_selection() {
        let mut session = ClientSession::new(ScriptedTransport::default());
        let file = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());

        let err = session.handle_file(file).await.unwrap_err();

        assert!(matches!(err, ClientError::UnsupportedFile));
        assert_eq!(session.state(), ClientState::Error);
        assert_eq!(session.status(), "Please select a PDF file.");
        assert!(prompts(&session).is_empty());
    }

    #[tokio::test]
    async fn test_file_flow_displays_default_summary() {
        let transport = ScriptedTransport::replying(vec![Ok("Short and sweet.".to_string())]);
        let mut session = ClientSession::new(transport);

        let summary = session.handle_file(hello_pdf()).await.unwrap().to_string();

        assert_eq!(summary, "Short and sweet.");
        assert_eq!(session.state(), ClientState::SummaryDisplayed);
        assert_eq!(session.status(), "Summary generated successfully!");
        assert_eq!(session.extracted_text(), Some("Hello world"));
        assert_eq!(
            session.preview(),
            &[PreviewPage { page_number: 1, width: 893, height: 1263 }]
        );
        assert_eq!(prompts(&session), vec!["Summarize this document: Hello world"]);
    }

    #[tokio::test]
    async fn test_bullet_tone_prompt() {
        let mut session = ClientSession::new(ScriptedTransport::default());
        session.handle_file(hello_pdf()).await.unwrap();

        session.select_tone(Tone::Bullet).await.unwrap();

        assert_eq!(session.tone(), Some(Tone::Bullet));
        let prompt = session.last_prompt().unwrap();
        assert!(prompt.ends_with("as a bullet summary: Hello world"));
        assert_eq!(session.state(), ClientState::SummaryDisplayed);
    }

    #[tokio::test]
    async fn test_regenerate_repeats_prompt_for_tone() {
        let mut session = ClientSession::new(ScriptedTransport::default());
        session.handle_file(hello_pdf()).await.unwrap();

        session.select_tone(Tone::Detailed).await.unwrap();
        session.regenerate().await.unwrap();

        let sent = prompts(&session);
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1], sent[2]);
        assert_eq!(
            sent[2],
            "Summarize this document as a detailed summary: Hello world"
        );
    }

    #[tokio::test]
    async fn test_regenerate_defaults_to_concise() {
        let mut session = ClientSession::new(ScriptedTransport::default());
        session.handle_file(hello_pdf()).await.unwrap();

        session.regenerate().await.unwrap();

        assert_eq!(
            session.last_prompt(),
            Some("Summarize this document as a concise summary: Hello world")
        );
    }

    #[tokio::test]
    async fn test_failure_is_recoverable() {
        let transport = ScriptedTransport::replying(vec![
            Err(ClientError::Server {
                status: 500,
                message: "Summarization API request failed with status: 429".to_string(),
            }),
            Ok("Second try worked.".to_string()),
        ]);
        let mut session = ClientSession::new(transport);

        let err = session.handle_file(hello_pdf()).await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500, .. }));
        assert_eq!(session.state(), ClientState::Error);
        assert_eq!(
            session.status(),
            "Error: Summarization API request failed with status: 429"
        );
        assert_eq!(session.summary_text(), Some(session.status()));

        let summary = session.regenerate().await.unwrap().to_string();
        assert_eq!(summary, "Second try worked.");
        assert_eq!(session.state(), ClientState::SummaryDisplayed);
    }

    #[tokio::test]
    async fn test_unparseable_pdf_fails_before_upload() {
        let mut session = ClientSession::new(ScriptedTransport::default());
        let file = SelectedFile::new("broken.pdf", "application/pdf", b"not really a pdf".to_vec());

        let err = session.handle_file(file).await.unwrap_err();

        assert!(matches!(err, ClientError::Extraction(_)));
        assert_eq!(session.state(), ClientState::Error);
        assert!(session.preview().is_empty());
        assert!(prompts(&session).is_empty());
    }

    #[tokio::test]
    async fn test_actions_need_a_document() {
        let mut session = ClientSession::new(ScriptedTransport::default());

        assert!(matches!(session.regenerate().await, Err(ClientError::NoDocument)));
        assert!(matches!(session.select_tone(Tone::Bullet).await, Err(ClientError::NoDocument)));
        assert!(matches!(session.copy_summary(), Err(ClientError::NothingToExport)));
        assert_eq!(session.state(), ClientState::Idle);
    }

    #[tokio::test]
    async fn test_copy_and_download_use_displayed_text() {
        let transport = ScriptedTransport::replying(vec![Ok("Exported summary.".to_string())]);
        let mut session = ClientSession::new(transport);
        session.handle_file(hello_pdf()).await.unwrap();

        assert_eq!(session.copy_summary().unwrap(), "Exported summary.");

        let dir = tempfile::tempdir().unwrap();
        let path = session.download_summary(dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), SUMMARY_FILE_NAME);
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            "Exported summary."
        );
    }
}
