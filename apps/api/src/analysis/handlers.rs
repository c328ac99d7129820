//! Axum route handler for resume analysis.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::AnalyzeResponse;
use crate::ocr::TextSource;
use crate::state::AppState;
use crate::upload::storage::StoredUpload;
use crate::upload::{read_resume_field, validate_upload};

/// POST /analyze
///
/// upload → validate → store → OCR → {contact fields, model analysis} → JSON.
/// Rejected uploads never reach OCR or the model. The stored file is removed
/// before the response is returned, whichever stage failed.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let span = info_span!("analyze", request_id = %Uuid::new_v4());

    async move {
        let upload = read_resume_field(&mut multipart).await?;
        validate_upload(&upload, state.config.max_upload_bytes)?;
        info!("Accepted upload: {} bytes", upload.size());

        let stored = StoredUpload::persist(&state.config.upload_dir, &upload).await?;
        let outcome = run_pipeline(&state, stored.path()).await;
        let released = stored.close();

        let response = outcome?;
        released?;
        Ok(Json(response))
    }
    .instrument(span)
    .await
}

async fn run_pipeline(state: &AppState, pdf: &Path) -> Result<AnalyzeResponse, AppError> {
    let text = state.recognizer.recognize(pdf).await?;
    match text.source() {
        TextSource::Ocr { pages } => {
            info!("OCR extracted {} chars from {pages} page(s)", text.as_str().len())
        }
        TextSource::TextLayer => info!("Text layer supplied {} chars", text.as_str().len()),
    }

    let contact = state.extractor.extract(text.as_str());
    info!(
        has_name = contact.name.is_some(),
        has_email = contact.email.is_some(),
        has_phone = contact.phone.is_some(),
        "Contact info extracted"
    );

    let analysis = state.analyzer.analyze(text.as_str()).await?;

    Ok(AnalyzeResponse::assemble(contact, analysis))
}
