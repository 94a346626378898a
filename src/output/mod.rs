//! Output formatting and report generation

pub mod formatter;
pub mod pdf;
pub mod report;

pub use formatter::{ReportGenerator, OutputFormatter};
pub use pdf::PdfReportWriter;
pub use report::{AnalysisReport, ReportMetadata};
