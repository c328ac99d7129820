use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::extraction::ContactExtractor;
use crate::ocr::TextRecognizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every request gets its own pipeline run.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable OCR engine. Default: pdftoppm + tesseract.
    pub recognizer: Arc<dyn TextRecognizer>,
    /// Pluggable contact extractor. Default: regex rules.
    pub extractor: Arc<dyn ContactExtractor>,
    /// Pluggable analyzer. Default: hosted model via `LlmClient`.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
}
