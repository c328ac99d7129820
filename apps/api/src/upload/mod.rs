//! Upload handling — reads the `resume` multipart field, validates it, and
//! stores it in a scoped temp file that is removed on every exit path.

pub mod storage;

use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Multipart field carrying the PDF.
pub const RESUME_FIELD: &str = "resume";

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MEDIA_TYPE: &str = "application/pdf";
const MAX_STORED_NAME_LEN: usize = 64;

/// One file as received from the browser. Owned by the request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Pulls the `resume` field out of the multipart body. Other fields are skipped.
pub async fn read_resume_field(multipart: &mut Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(RESUME_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedDocument {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::InvalidUpload("No file uploaded".to_string()))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded file exceeds the size limit".to_string())
    } else {
        AppError::InvalidUpload(format!("Malformed upload: {}", err.body_text()))
    }
}

/// Rejects empty, oversized and non-PDF uploads, in that order.
pub fn validate_upload(doc: &UploadedDocument, max_bytes: usize) -> Result<(), AppError> {
    if doc.size() == 0 {
        return Err(AppError::InvalidUpload(
            "The uploaded file is empty".to_string(),
        ));
    }

    if doc.size() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum {}.",
            human_size(max_bytes)
        )));
    }

    if !is_pdf(doc) {
        return Err(AppError::UnsupportedMediaType(
            "Only PDF files are supported".to_string(),
        ));
    }

    Ok(())
}

fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

/// Content must carry the PDF signature, and the browser must have declared
/// it as a PDF either by media type or by extension.
fn is_pdf(doc: &UploadedDocument) -> bool {
    let declared_type = doc
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or_default().trim())
        .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_MEDIA_TYPE));
    let declared_ext = doc.filename.to_ascii_lowercase().ends_with(".pdf");

    doc.bytes.starts_with(PDF_MAGIC) && (declared_type || declared_ext)
}

/// Sanitize a client filename into a safe temp-file prefix: strips path
/// separators and control characters, replaces anything unusual, drops the
/// extension. Never empty.
pub fn sanitize_filename(name: &str) -> String {
    // Only the last path component is meaningful.
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = match base.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("pdf") => stem,
        _ => base,
    };

    let sanitized: String = stem
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.replace("..", "");
    let sanitized = sanitized.trim_matches(['.', '_']);
    if sanitized.is_empty() {
        return "resume".to_string();
    }
    sanitized.chars().take(MAX_STORED_NAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str, content_type: Option<&str>, bytes: &'static [u8]) -> UploadedDocument {
        UploadedDocument {
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_accepts_pdf() {
        let d = doc("cv.pdf", Some("application/pdf"), b"%PDF-1.7\n...");
        assert!(validate_upload(&d, 1024).is_ok());
    }

    #[test]
    fn test_accepts_pdf_with_generic_type_and_pdf_extension() {
        let d = doc("CV.PDF", Some("application/octet-stream"), b"%PDF-1.4");
        assert!(validate_upload(&d, 1024).is_ok());
    }

    #[test]
    fn test_rejects_empty_file() {
        let d = doc("cv.pdf", Some("application/pdf"), b"");
        assert!(matches!(
            validate_upload(&d, 1024),
            Err(AppError::InvalidUpload(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let d = doc("cv.pdf", Some("application/pdf"), b"%PDF-1.7 0123456789");
        assert!(matches!(
            validate_upload(&d, 8),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_rejects_non_pdf_content_even_with_pdf_name() {
        let d = doc("cv.pdf", Some("application/pdf"), b"\x89PNG\r\n\x1a\n");
        assert!(matches!(
            validate_upload(&d, 1024),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_rejects_pdf_bytes_declared_as_something_else() {
        let d = doc("notes.txt", Some("text/plain"), b"%PDF-1.7");
        assert!(matches!(
            validate_upload(&d, 1024),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_size_limit_message() {
        assert_eq!(human_size(16 * 1024 * 1024), "16MB");
        assert_eq!(human_size(1024), "1KB");
        assert_eq!(human_size(8), "8 bytes");
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename("C:\\Users\\me\\My CV.pdf"), "My_CV");
    }

    #[test]
    fn test_sanitize_control_and_unicode() {
        assert_eq!(sanitize_filename("jane\u{0}\n doe.pdf"), "jane_doe");
        assert_eq!(sanitize_filename("résumé.pdf"), "r_sum");
    }

    #[test]
    fn test_sanitize_never_empty_and_bounded() {
        assert_eq!(sanitize_filename(""), "resume");
        assert_eq!(sanitize_filename("...pdf"), "resume");
        assert_eq!(sanitize_filename("/"), "resume");
        let long = "a".repeat(500) + ".pdf";
        assert_eq!(sanitize_filename(&long).len(), MAX_STORED_NAME_LEN);
    }
}
