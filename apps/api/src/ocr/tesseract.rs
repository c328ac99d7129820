use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::ocr::{join_pages, ExtractedText, OcrError, TextRecognizer, TextSource};

const PAGE_PREFIX: &str = "page";

/// Rasterise with `pdftoppm`, recognise each page with `tesseract`.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: OcrConfig,
}

#[derive(Debug)]
enum ToolFailure {
    Spawn(std::io::Error),
    TimedOut,
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolFailure::Spawn(e) => write!(f, "could not start: {e}"),
            ToolFailure::TimedOut => write!(f, "timed out"),
        }
    }
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    async fn run(&self, command: &mut Command) -> Result<Output, ToolFailure> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(self.config.timeout, command.output()).await {
            Ok(result) => result.map_err(ToolFailure::Spawn),
            Err(_) => Err(ToolFailure::TimedOut),
        }
    }

    /// Renders every page to `<dir>/page-N.png` and returns them in page order.
    async fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
        let mut command = Command::new(&self.config.pdftoppm_path);
        command
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(dir.join(PAGE_PREFIX));

        let output = self.run(&mut command).await.map_err(|e| {
            OcrError::Engine(format!("{} {e}", self.config.pdftoppm_path))
        })?;

        if !output.status.success() {
            return Err(OcrError::Unreadable(stderr_summary(&output)));
        }

        let pages = collect_pages(dir)
            .map_err(|e| OcrError::Engine(format!("cannot list rendered pages: {e}")))?;
        if pages.is_empty() {
            return Err(OcrError::Unreadable("no pages rendered".to_string()));
        }
        Ok(pages)
    }

    async fn recognize_page(&self, image: &Path) -> Result<String, String> {
        let mut command = Command::new(&self.config.tesseract_path);
        command
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language);

        let output = self
            .run(&mut command)
            .await
            .map_err(|e| format!("{} {e}", self.config.tesseract_path))?;

        if !output.status.success() {
            return Err(stderr_summary(&output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextRecognizer for TesseractOcr {
    async fn recognize(&self, pdf: &Path) -> Result<ExtractedText, OcrError> {
        let work_dir = tempfile::Builder::new()
            .prefix("scorer-ocr-")
            .tempdir()
            .map_err(|e| OcrError::Engine(format!("failed to create OCR temp dir: {e}")))?;

        let images = self.rasterize(pdf, work_dir.path()).await?;
        info!("Rendered {} page(s) at {} DPI", images.len(), self.config.dpi);

        let mut pages = Vec::with_capacity(images.len());
        let mut last_failure = None;
        for (index, image) in images.iter().enumerate() {
            match self.recognize_page(image).await {
                Ok(text) => {
                    debug!("Page {} recognised: {} chars", index + 1, text.len());
                    pages.push(text);
                }
                Err(e) => {
                    warn!("Recognition failed on page {}: {e}", index + 1);
                    last_failure = Some(e);
                }
            }
        }

        if pages.is_empty() {
            let reason = last_failure.unwrap_or_else(|| "no pages recognised".to_string());
            return Err(OcrError::Engine(reason));
        }

        let text = join_pages(&pages);
        if text.trim().is_empty() {
            return Err(OcrError::NoText);
        }

        Ok(ExtractedText::new(
            text,
            TextSource::Ocr {
                pages: images.len(),
            },
        ))
    }
}

fn stderr_summary(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.lines().take(3).collect::<Vec<_>>().join(" | ")
    }
}

/// `page-1.png`, `page-02.png`, ... sorted numerically.
fn collect_pages(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (prefix, number) = stem.rsplit_once('-')?;
    if prefix != PAGE_PREFIX {
        return None;
    }
    number.parse().ok()
}
