use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// 16 MiB, the largest resume the service accepts.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_ANALYSIS_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_ANALYSIS_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Read once at startup; fails fast if the API credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub analysis_model: String,
    pub analysis_api_base: String,
    pub max_upload_bytes: usize,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub ocr: OcrConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Settings for the rasterise + recognise OCR pipeline.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    /// Raster resolution handed to `pdftoppm -r`.
    pub dpi: u32,
    pub language: String,
    /// Upper bound for each external process (rasteriser or one recognition page).
    pub timeout: Duration,
    /// Try the embedded PDF text layer before falling back to OCR.
    pub prefer_text_layer: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            dpi: 300,
            language: "eng".to_string(),
            timeout: Duration::from_secs(60),
            prefer_text_layer: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = OcrConfig::default();

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            analysis_model: env_or("ANALYSIS_MODEL", DEFAULT_ANALYSIS_MODEL),
            analysis_api_base: env_or("ANALYSIS_API_BASE", DEFAULT_ANALYSIS_API_BASE),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
            ocr: OcrConfig {
                pdftoppm_path: env_or("PDFTOPPM_PATH", &defaults.pdftoppm_path),
                tesseract_path: env_or("TESSERACT_PATH", &defaults.tesseract_path),
                dpi: parse_env("OCR_DPI", defaults.dpi)?,
                language: env_or("OCR_LANGUAGE", &defaults.language),
                timeout: Duration::from_secs(parse_env(
                    "OCR_TIMEOUT_SECS",
                    defaults.timeout.as_secs(),
                )?),
                prefer_text_layer: parse_flag(std::env::var("OCR_PREFER_TEXT_LAYER").ok()),
            },
            port: parse_env("PORT", 8080u16)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}"))
}

fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
