//! Input manager: turns resume and job-description files into plain text

use crate::error::{AtsScorerError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Reads documents through the extractor matching their extension.
///
/// Extracted text is cached per path, so a file named twice on one command
/// line is only parsed once.
pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract the text of any supported document.
    ///
    /// A missing file is `MissingInput`; an unreadable extension is
    /// `InvalidInput` or `UnsupportedFormat`.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        // Check cache first
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        // An absent document is reported, never scored as empty text
        if !path.exists() {
            return Err(AtsScorerError::MissingInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path).ok_or_else(|| {
            AtsScorerError::InvalidInput(format!("File has no extension: {}", path.display()))
        })?;

        // Route to the matching extractor
        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Unknown => {
                return Err(AtsScorerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };
        info!(
            "Read {} document {} ({} words)",
            file_type,
            path.display(),
            text.split_whitespace().count()
        );

        // Cache the result
        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Like [`extract_text`](Self::extract_text), but restricted to the given file types
    pub async fn extract_text_as(&mut self, path: &Path, allowed: &[FileType]) -> Result<String> {
        match FileType::from_path(path) {
            Some(file_type) if allowed.contains(&file_type) => self.extract_text(path).await,
            detected => {
                debug!("Rejected {} (detected {:?})", path.display(), detected);
                Err(AtsScorerError::UnsupportedFormat(format!(
                    "{} must be one of: {}",
                    path.display(),
                    allowed
                        .iter()
                        .map(FileType::label)
                        .collect::<Vec<_>>()
                        .join(", ")
                )))
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.txt");
        std::fs::write(&path, "Data analyst wanted").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Data analyst wanted");
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "# Jane\n\nAnalyst").unwrap();

        let mut manager = InputManager::new();
        manager.extract_text(&path).await.unwrap();
        assert_eq!(manager.cache_size(), 1);

        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_file_without_extension_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume");
        std::fs::write(&path, "text").unwrap();

        let result = InputManager::new().extract_text(&path).await;
        assert!(matches!(result, Err(AtsScorerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_restricted_types_name_the_allowed_formats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "text").unwrap();

        let err = InputManager::new()
            .extract_text_as(&path, &[FileType::Pdf, FileType::Text])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("PDF, plain text"));
    }
}
