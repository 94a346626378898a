//! Error handling for the ATS scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Malformed model response: {0}")]
    MalformedModelResponse(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Generative service failure: {0}")]
    UpstreamService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AtsScorerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AtsScorerError {
    fn from(err: anyhow::Error) -> Self {
        AtsScorerError::InvalidInput(err.to_string())
    }
}

/// Transport-level failures talking to the generative service are fatal for the request
impl From<reqwest::Error> for AtsScorerError {
    fn from(err: reqwest::Error) -> Self {
        AtsScorerError::UpstreamService(err.to_string())
    }
}

