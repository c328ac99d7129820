//! OCR adapter — turns a stored PDF into plain text.
//!
//! The default engine rasterises pages with `pdftoppm` and recognises each
//! page image with `tesseract`. An optional text-layer fast path reads
//! embedded PDF text first and only falls back to OCR when there is too little.

pub mod tesseract;
pub mod text_layer;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::OcrConfig;

pub use tesseract::TesseractOcr;
pub use text_layer::TextLayerFirst;

/// Inserted between pages of recognised text.
pub const PAGE_SEPARATOR: &str = "\n\u{0c}\n";

#[derive(Debug, Error)]
pub enum OcrError {
    /// Corrupt or unsupported PDF: the rasteriser could not produce pages.
    #[error("document unreadable: {0}")]
    Unreadable(String),

    /// The recognition engine could not run, crashed on every page, or timed out.
    #[error("recognition engine failed: {0}")]
    Engine(String),

    /// The engine ran but found no text on any page.
    #[error("no extractable text")]
    NoText,
}

/// Where the text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Ocr { pages: usize },
    TextLayer,
}

/// Immutable text recognised from one upload. Scoped to the request.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    text: String,
    source: TextSource,
}

impl ExtractedText {
    pub fn new(text: String, source: TextSource) -> Self {
        Self { text, source }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> TextSource {
        self.source
    }
}

/// Converts a validated, stored PDF into text. Implement this to swap engines.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, pdf: &Path) -> Result<ExtractedText, OcrError>;
}

/// Builds the recognizer described by the config.
pub fn build_recognizer(config: &OcrConfig) -> Arc<dyn TextRecognizer> {
    let ocr = TesseractOcr::new(config.clone());
    if config.prefer_text_layer {
        Arc::new(TextLayerFirst::new(ocr))
    } else {
        Arc::new(ocr)
    }
}

/// Joins per-page text in page order.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref().trim_end())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
