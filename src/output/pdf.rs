//! Downloadable PDF summary of a JD-match evaluation

use crate::error::{AtsScorerError, Result};
use crate::llm::parser::JdMatch;
use log::debug;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::path::Path;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.0;
const WRAP_COLUMNS: usize = 90;

/// Writes the title, JD match, missing keywords and profile summary to a PDF
pub struct PdfReportWriter {
    title: String,
}

/// Tracks the current page and vertical position while writing
struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Cursor {
    fn line(&mut self, text: &str, size: f32, bold: bool) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(latin1(text), size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT * size / 11.0;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT / 2.0;
    }
}

impl PdfReportWriter {
    pub fn new() -> Self {
        Self {
            title: "ATS Resume Evaluation Report".to_string(),
        }
    }

    pub fn render(&self, jd_match: &JdMatch) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(&self.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut cursor = Cursor {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        };

        cursor.line(&self.title, 16.0, true);
        cursor.gap();
        cursor.line(&format!("JD Match: {}%", jd_match.match_percent), 12.0, true);
        cursor.gap();

        cursor.line("Missing Keywords:", 12.0, true);
        if jd_match.missing_keywords.is_empty() {
            cursor.line("None", 11.0, false);
        }
        for keyword in &jd_match.missing_keywords {
            for line in wrap(&format!("- {}", keyword), WRAP_COLUMNS) {
                cursor.line(&line, 11.0, false);
            }
        }
        cursor.gap();

        cursor.line("Profile Summary:", 12.0, true);
        for line in wrap(&jd_match.profile_summary, WRAP_COLUMNS) {
            cursor.line(&line, 11.0, false);
        }

        cursor.doc.save_to_bytes().map_err(pdf_error)
    }

    pub fn write_to_file(&self, jd_match: &JdMatch, path: &Path) -> Result<()> {
        let bytes = self.render(jd_match)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;
        debug!("Wrote {} byte PDF report to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl Default for PdfReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn pdf_error(e: printpdf::Error) -> AtsScorerError {
    AtsScorerError::OutputFormatting(format!("Failed to build PDF report: {}", e))
}

/// The builtin fonts only cover Latin-1
fn latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 256 && !c.is_control() { c } else { '?' })
        .collect()
}

/// Greedy word wrap on character count
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
        if needed > columns && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
