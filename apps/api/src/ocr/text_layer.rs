use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::ocr::{ExtractedText, OcrError, TextRecognizer, TextSource};

/// Below this many non-whitespace characters the text layer is treated as
/// missing (scanned resume) and OCR runs instead.
pub const MIN_TEXT_LAYER_CHARS: usize = 200;

/// Reads the embedded PDF text layer with `pdf-extract`; falls back to the
/// wrapped recognizer when the layer is absent, too thin, or unparsable.
pub struct TextLayerFirst<R> {
    fallback: R,
    min_chars: usize,
}

impl<R> TextLayerFirst<R> {
    pub fn new(fallback: R) -> Self {
        Self {
            fallback,
            min_chars: MIN_TEXT_LAYER_CHARS,
        }
    }
}

#[async_trait]
impl<R: TextRecognizer> TextRecognizer for TextLayerFirst<R> {
    async fn recognize(&self, pdf: &Path) -> Result<ExtractedText, OcrError> {
        let path = pdf.to_path_buf();
        // pdf-extract is synchronous and can panic on odd files; both end up as a fallback.
        let layer = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await;

        match layer {
            Ok(Ok(text)) if has_enough_text(&text, self.min_chars) => {
                info!("Using embedded text layer ({} chars)", text.len());
                return Ok(ExtractedText::new(text, TextSource::TextLayer));
            }
            Ok(Ok(_)) => debug!("Text layer too thin, running OCR"),
            Ok(Err(e)) => debug!("Text layer unreadable ({e}), running OCR"),
            Err(e) => debug!("Text layer extraction aborted ({e}), running OCR"),
        }

        self.fallback.recognize(pdf).await
    }
}

fn has_enough_text(text: &str, min_chars: usize) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() >= min_chars
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingOcr {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextRecognizer for CountingOcr {
        async fn recognize(&self, _pdf: &Path) -> Result<ExtractedText, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExtractedText::new(
                "from ocr".to_string(),
                TextSource::Ocr { pages: 1 },
            ))
        }
    }

    #[test]
    fn test_has_enough_text_ignores_whitespace() {
        assert!(has_enough_text("a b c", 3));
        assert!(!has_enough_text("a \n\n\t b", 3));
        assert!(!has_enough_text("", 1));
    }

    #[tokio::test]
    async fn test_unparsable_pdf_falls_back_to_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("broken.pdf");
        std::fs::write(&pdf, b"%PDF-1.7\nnot really a pdf").unwrap();

        let recognizer = TextLayerFirst::new(CountingOcr {
            calls: AtomicUsize::new(0),
        });
        let text = recognizer.recognize(&pdf).await.unwrap();

        assert_eq!(text.as_str(), "from ocr");
        assert_eq!(recognizer.fallback.calls.load(Ordering::SeqCst), 1);
    }
}
