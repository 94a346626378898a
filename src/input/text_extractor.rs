//! Text extraction from various file formats

use crate::error::{AtsScorerError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl PdfExtractor {
    /// Concatenated text of every page; no layout is preserved
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AtsScorerError::PdfExtraction(e.to_string()))
    }
}

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsScorerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(self.markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Drop markdown syntax, keeping one line per block element
    pub fn markdown_to_text(&self, markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(Tag::Emphasis)
                | Event::End(Tag::Strong)
                | Event::End(Tag::Strikethrough)
                | Event::End(Tag::Link(..))
                | Event::End(Tag::Image(..)) => {}
                Event::End(_) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text_strips_syntax() {
        let markdown = "# Jane Roe\n\n**Data Analyst** with `SQL` and [Python](https://python.org)\n\n- Tableau\n- Excel\n";
        let text = MarkdownExtractor.markdown_to_text(markdown);

        assert_eq!(text, "Jane Roe\nData Analyst with SQL and Python\nTableau\nExcel");
    }

    #[test]
    fn test_invalid_pdf_bytes_are_an_extraction_error() {
        let result = PdfExtractor.extract_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(AtsScorerError::PdfExtraction(_))));
    }
}
