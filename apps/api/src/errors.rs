use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ocr::OcrError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": "<message>", "code": "<CODE>"}`.
/// Messages for server-side failures are generic; details go to the log only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Analysis API error: {0}")]
    AnalysisApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidUpload(_) => (StatusCode::BAD_REQUEST, "INVALID_UPLOAD"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::UnsupportedMediaType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
            ),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Ocr(OcrError::Unreadable(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNREADABLE_DOCUMENT")
            }
            AppError::Ocr(OcrError::NoText) => (StatusCode::UNPROCESSABLE_ENTITY, "NO_TEXT_FOUND"),
            AppError::Ocr(OcrError::Engine(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "OCR_ERROR"),
            AppError::AnalysisApi(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_API_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// The human-readable message shown to the user.
    fn public_message(&self) -> String {
        match self {
            AppError::InvalidUpload(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::UnsupportedMediaType(msg) => msg.clone(),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "The uploaded file could not be stored. Please try again.".to_string()
            }
            AppError::Ocr(OcrError::Unreadable(detail)) => {
                tracing::warn!("Unreadable PDF: {detail}");
                "The PDF could not be read. It may be corrupt or in an unsupported format."
                    .to_string()
            }
            AppError::Ocr(OcrError::NoText) => {
                "No text could be extracted from the PDF. Please upload a clearer copy.".to_string()
            }
            AppError::Ocr(OcrError::Engine(detail)) => {
                tracing::error!("OCR engine error: {detail}");
                "Text recognition failed. Please try again later.".to_string()
            }
            AppError::AnalysisApi(msg) => {
                tracing::error!("Analysis API error: {msg}");
                "The resume analysis service is unavailable. Please try again later.".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.public_message();

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_rejections_are_client_errors() {
        for err in [
            AppError::InvalidUpload("empty".into()),
            AppError::PayloadTooLarge("big".into()),
            AppError::UnsupportedMediaType("png".into()),
        ] {
            assert!(err.status_and_code().0.is_client_error(), "{err}");
        }
    }

    #[test]
    fn test_ocr_failure_kinds_map_to_distinct_codes() {
        let unreadable = AppError::Ocr(OcrError::Unreadable("bad xref".into()));
        let no_text = AppError::Ocr(OcrError::NoText);
        let engine = AppError::Ocr(OcrError::Engine("tesseract crashed".into()));

        assert_eq!(unreadable.status_and_code().1, "UNREADABLE_DOCUMENT");
        assert_eq!(no_text.status_and_code().1, "NO_TEXT_FOUND");
        assert_eq!(engine.status_and_code().1, "OCR_ERROR");
        assert_eq!(engine.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::AnalysisApi("401 API key not valid: sk-secret".into());
        let message = err.public_message();
        assert!(!message.contains("sk-secret"));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_GATEWAY);
    }
}
