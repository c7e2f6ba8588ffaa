use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const MAX_COVER_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_PDF_BYTES: usize = 50 * 1024 * 1024;

const ALLOWED_COVER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const COVER_SUBDIR: &str = "guides/covers";
const PDF_SUBDIR: &str = "guides/pdfs";

/// An uploaded file buffered in memory, as collected from a multipart form.
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Stores magazine assets on local disk under the configured uploads root.
/// Stored paths are returned as `/uploads/...` web paths.
#[derive(Clone)]
pub struct FileService {
    root_dir: PathBuf,
}

impl FileService {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn validate_cover(file: &UploadedFile) -> AppResult<()> {
        if file.data.is_empty() {
            return Err(AppError::ValidationError(
                "Cover image file is empty".to_string(),
            ));
        }

        let extension = file_extension(&file.file_name);
        if !ALLOWED_COVER_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::ValidationError(
                "Cover image must be a .jpg, .jpeg, .png or .webp file".to_string(),
            ));
        }

        if file.data.len() > MAX_COVER_BYTES {
            return Err(AppError::ValidationError(
                "Cover image must not exceed 5 MB".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_pdf(file: &UploadedFile) -> AppResult<()> {
        if file.data.is_empty() {
            return Err(AppError::ValidationError("PDF file is empty".to_string()));
        }

        if file_extension(&file.file_name) != "pdf" {
            return Err(AppError::ValidationError(
                "Magazine file must be a .pdf file".to_string(),
            ));
        }

        if file.content_type.as_deref() != Some("application/pdf") {
            return Err(AppError::ValidationError(
                "Magazine file must have content type application/pdf".to_string(),
            ));
        }

        if file.data.len() > MAX_PDF_BYTES {
            return Err(AppError::ValidationError(
                "PDF file must not exceed 50 MB".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn save_cover(&self, file: &UploadedFile) -> AppResult<String> {
        Self::validate_cover(file)?;
        self.store(file, COVER_SUBDIR).await
    }

    pub async fn save_pdf(&self, file: &UploadedFile) -> AppResult<String> {
        Self::validate_pdf(file)?;
        self.store(file, PDF_SUBDIR).await
    }

    async fn store(&self, file: &UploadedFile, subdir: &str) -> AppResult<String> {
        let directory = self.root_dir.join(subdir);
        tokio::fs::create_dir_all(&directory).await?;

        // Strip any path components the client may have smuggled into the name.
        let base_name = Path::new(&file.file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file");
        let unique_name = format!("{}_{}", Uuid::new_v4(), base_name);

        tokio::fs::write(directory.join(&unique_name), &file.data).await?;

        Ok(format!("/uploads/{subdir}/{unique_name}"))
    }

    /// Removes a previously stored file. Missing files are ignored and other
    /// failures are only logged, since stale assets must not block the caller.
    pub async fn delete_file(&self, web_path: &str) {
        let path = self.full_path(web_path);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to delete file {}: {err}", path.display());
            }
        }
    }

    /// Maps a stored `/uploads/...` web path back to its on-disk location.
    pub fn full_path(&self, web_path: &str) -> PathBuf {
        let relative = web_path
            .trim_start_matches('/')
            .trim_start_matches("uploads/");
        self.root_dir.join(relative)
    }
}

fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            data: vec![0u8; size],
        }
    }

    fn pdf(name: &str, content_type: Option<&str>, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(|ct| ct.to_string()),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn accepts_valid_cover_extensions() {
        for name in ["a.jpg", "b.JPEG", "c.png", "d.webp"] {
            assert!(FileService::validate_cover(&cover(name, 10)).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_cover_extension() {
        assert!(FileService::validate_cover(&cover("a.gif", 10)).is_err());
        assert!(FileService::validate_cover(&cover("noext", 10)).is_err());
    }

    #[test]
    fn rejects_empty_cover() {
        assert!(FileService::validate_cover(&cover("a.jpg", 0)).is_err());
    }

    #[test]
    fn rejects_oversized_cover() {
        assert!(FileService::validate_cover(&cover("a.jpg", MAX_COVER_BYTES + 1)).is_err());
        assert!(FileService::validate_cover(&cover("a.jpg", MAX_COVER_BYTES)).is_ok());
    }

    #[test]
    fn pdf_requires_extension_and_content_type() {
        assert!(FileService::validate_pdf(&pdf("m.pdf", Some("application/pdf"), 10)).is_ok());
        assert!(FileService::validate_pdf(&pdf("m.pdf", Some("text/plain"), 10)).is_err());
        assert!(FileService::validate_pdf(&pdf("m.pdf", None, 10)).is_err());
        assert!(FileService::validate_pdf(&pdf("m.txt", Some("application/pdf"), 10)).is_err());
    }

    #[test]
    fn rejects_oversized_pdf() {
        assert!(FileService::validate_pdf(&pdf("m.pdf", Some("application/pdf"), MAX_PDF_BYTES + 1)).is_err());
    }

    #[test]
    fn full_path_strips_web_prefix() {
        let service = FileService::new("/data/uploads");
        assert_eq!(
            service.full_path("/uploads/guides/pdfs/x.pdf"),
            PathBuf::from("/data/uploads/guides/pdfs/x.pdf")
        );
    }
}
