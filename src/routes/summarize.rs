use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap},
    routing::{post, MethodRouter},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AppState, SummaryResult};
use crate::prompt::Instruction;
use crate::types::{AppError, AppResult};
use crate::upload::{self, SummarizeForm};

/// Path the single-invocation handler routes every event to.
pub const SUMMARIZE_PATH: &str = "/summarize";

pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config.limits.max_upload_bytes;

    Router::new()
        .route(SUMMARIZE_PATH, summarize_route())
        .route("/api/summarize", summarize_route())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

fn summarize_route() -> MethodRouter<AppState> {
    post(summarize).fallback(method_not_allowed)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SummaryResult>> {
    let multipart = multipart.map_err(|rejection| multipart_rejection(&headers, rejection))?;

    let SummarizeForm {
        document,
        prompt,
        tone,
    } = upload::parse_multipart(multipart).await?;

    info!(
        filename = %document.filename,
        bytes = document.size(),
        custom_prompt = prompt.is_some(),
        tone = ?tone,
        "Summarize request received"
    );

    let instruction = Instruction::from_fields(prompt, tone);
    let result = state.summarizer.summarize(document, instruction).await?;

    info!(model = %state.summarizer.model(), "Summary relayed");
    Ok(Json(result))
}

/// A body that is not multipart carries no file. One declared as
/// multipart/form-data that cannot be parsed is a failed upload.
fn multipart_rejection(headers: &HeaderMap, rejection: MultipartRejection) -> AppError {
    let declared_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA);

    if declared_multipart {
        warn!(%rejection, "Multipart body could not be parsed");
        AppError::Upload(rejection.body_text())
    } else {
        warn!(%rejection, "Request body is not multipart/form-data");
        AppError::Validation("No PDF file uploaded.".to_string())
    }
}
