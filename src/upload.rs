//! Document intake
//!
//! Parses the `multipart/form-data` body of a summarize request. The file
//! stays in memory for the lifetime of the request.

use axum::extract::Multipart;
use tracing::debug;

use crate::models::UploadedDocument;
use crate::prompt::Tone;
use crate::types::{AppError, AppResult};

pub const PDF_FIELD: &str = "pdf";
pub const PROMPT_FIELD: &str = "prompt";
pub const TONE_FIELD: &str = "tone";

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Parsed form fields of a summarize request.
#[derive(Debug)]
pub struct SummarizeForm {
    pub document: UploadedDocument,
    pub prompt: Option<String>,
    pub tone: Option<Tone>,
}

pub async fn parse_multipart(mut multipart: Multipart) -> AppResult<SummarizeForm> {
    let mut document: Option<UploadedDocument> = None;
    let mut prompt: Option<String> = None;
    let mut tone: Option<Tone> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            PDF_FIELD => {
                if document.is_some() {
                    return Err(AppError::Upload(
                        "Unexpected field: only one PDF file may be uploaded".to_string(),
                    ));
                }
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(format!("Failed to read file data: {}", e)))?;

                document = Some(UploadedDocument {
                    filename,
                    content_type,
                    bytes,
                });
            }
            PROMPT_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("Failed to read prompt: {}", e)))?;
                if !value.trim().is_empty() {
                    prompt = Some(value);
                }
            }
            TONE_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("Failed to read tone: {}", e)))?;
                if !value.trim().is_empty() {
                    tone = Some(value.parse()?);
                }
            }
            _ => {
                debug!(field = %name, "Ignoring unknown form field");
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(format!("Failed to read form field: {}", e)))?;
            }
        }
    }

    let document =
        document.ok_or_else(|| AppError::Validation("No PDF file uploaded.".to_string()))?;
    validate_document(&document)?;

    Ok(SummarizeForm {
        document,
        prompt,
        tone,
    })
}

/// Rejects empty uploads and files that are neither declared nor signed as PDF.
pub fn validate_document(document: &UploadedDocument) -> AppResult<()> {
    if document.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded PDF is empty.".to_string()));
    }
    if !is_pdf(document.content_type.as_deref(), &document.bytes) {
        return Err(AppError::Validation("Uploaded file is not a PDF.".to_string()));
    }
    Ok(())
}

pub fn is_pdf_media_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.essence_str() == mime::APPLICATION_PDF.essence_str())
        .unwrap_or(false)
}

fn is_pdf(content_type: Option<&str>, bytes: &[u8]) -> bool {
    content_type.map(is_pdf_media_type).unwrap_or(false) || bytes.starts_with(PDF_SIGNATURE)
}
