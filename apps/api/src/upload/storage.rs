use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::upload::{sanitize_filename, UploadedDocument};

/// A validated upload written to the upload directory.
///
/// The file lives exactly as long as this guard: `close` removes it and
/// reports failures, and dropping the guard on any other path (early return,
/// panic, cancelled request) removes it too.
#[derive(Debug)]
pub struct StoredUpload {
    file: NamedTempFile,
}

impl StoredUpload {
    /// Writes the document under a unique name derived from its sanitized filename.
    pub async fn persist(dir: &Path, doc: &UploadedDocument) -> Result<Self, AppError> {
        let prefix = format!("{}-", sanitize_filename(&doc.filename));
        let dir: PathBuf = dir.to_path_buf();
        let bytes = doc.bytes.clone();

        let file = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(".pdf")
                .tempfile_in(&dir)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| AppError::Storage(format!("Upload write task failed: {e}")))?
        .map_err(|e| AppError::Storage(format!("Failed to store upload: {e}")))?;

        debug!("Stored upload at {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Removes the stored file, surfacing any I/O error.
    pub fn close(self) -> Result<(), AppError> {
        let path = self.file.path().to_path_buf();
        self.file.close().map_err(|e| {
            warn!("Failed to remove upload {}: {e}", path.display());
            AppError::Storage(format!("Failed to remove upload {}: {e}", path.display()))
        })?;
        debug!("Removed upload {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn pdf_doc(name: &str) -> UploadedDocument {
        UploadedDocument {
            filename: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.7\n%%EOF\n"),
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_persist_writes_inside_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredUpload::persist(dir.path(), &pdf_doc("../../evil.pdf"))
            .await
            .unwrap();

        assert_eq!(stored.path().parent().unwrap(), dir.path());
        let name = stored.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("evil-"), "{name}");
        assert!(name.ends_with(".pdf"), "{name}");
        assert_eq!(std::fs::read(stored.path()).unwrap(), b"%PDF-1.7\n%%EOF\n");

        stored.close().unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_same_filename_gets_unique_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = StoredUpload::persist(dir.path(), &pdf_doc("cv.pdf")).await.unwrap();
        let b = StoredUpload::persist(dir.path(), &pdf_doc("cv.pdf")).await.unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(entries(dir.path()), 2);
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let stored = StoredUpload::persist(dir.path(), &pdf_doc("cv.pdf")).await.unwrap();
            stored.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_persist_into_missing_dir_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = StoredUpload::persist(&missing, &pdf_doc("cv.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
