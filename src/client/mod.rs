//! Client controller
//!
//! Drives one user's interaction with the summarize endpoint: pick a file,
//! lay out its preview, extract its text locally, request summaries and
//! export the displayed result. All state lives in [`ClientSession`].

pub mod preview;
pub mod session;
pub mod transport;

use std::path::Path;

use bytes::Bytes;

use crate::upload::is_pdf_media_type;

pub use preview::{PreviewPage, PREVIEW_SCALE};
pub use session::{ClientSession, ClientState, SUMMARY_FILE_NAME};
pub use transport::{HttpTransport, SummaryTransport};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Please select a PDF file.")]
    UnsupportedFile,

    #[error("No document has been loaded.")]
    NoDocument,

    #[error("There is no summary to export.")]
    NothingToExport,

    #[error("{0}")]
    Extraction(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Could not access file: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// A file the user picked or dropped.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads `path`, guessing the media type from its extension.
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        Ok(Self::new(name, media_type, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_media_type(&self.media_type)
    }
}
