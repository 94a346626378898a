//! Generative service integration: client, prompts, strict response parsing
//! and the analysis pipeline built on them

pub mod analyzer;
pub mod client;
pub mod parser;
pub mod prompts;

pub use analyzer::{AtsAnalysis, AtsAnalyzer};
pub use client::{GeminiClient, GenerativeService};
