//! Hosted generative-text service client
//!
//! The service is treated as opaque text-in/text-out. Everything that talks
//! to it goes through [`GenerativeService`], so the analysis pipeline can run
//! against a canned implementation in tests.

use crate::config::ServiceConfig;
use crate::error::{AtsScorerError, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub trait GenerativeService {
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: ServiceErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Client for a Gemini-style `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_retries: u32,
}

impl GeminiClient {
    /// The credential is passed in explicitly; the client never reads the environment.
    pub fn new(config: &ServiceConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn call_once(&self, request: &GenerateContentRequest<'_>) -> CallOutcome {
        let response = match self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return CallOutcome::Retryable(AtsScorerError::from(e)),
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return CallOutcome::Retryable(AtsScorerError::UpstreamService(format!(
                "status {}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return CallOutcome::Fatal(AtsScorerError::UpstreamService(format!(
                "status {}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let parsed: GenerateContentResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return CallOutcome::Fatal(AtsScorerError::UpstreamService(format!(
                    "unreadable response body: {}",
                    e
                )))
            }
        };

        match parsed.text() {
            Some(text) => CallOutcome::Success(text),
            None => CallOutcome::Fatal(AtsScorerError::UpstreamService(
                "service returned no text content".to_string(),
            )),
        }
    }
}

enum CallOutcome {
    Success(String),
    Retryable(AtsScorerError),
    Fatal(AtsScorerError),
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ServiceError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

impl GenerativeService for GeminiClient {
    /// Sends the prompt and returns the model's text.
    ///
    /// Transport errors, 429 and 5xx are retried up to `max_retries` times with
    /// exponential backoff (1s, 2s, 4s, ...). With the default of zero the call
    /// is fail-fast.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("calling {} (prompt length: {} chars)", self.model, prompt.len());

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(16)));
                warn!(
                    "generative service attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.call_once(&request).await {
                CallOutcome::Success(text) => {
                    debug!("generative service returned {} chars", text.len());
                    return Ok(text);
                }
                CallOutcome::Fatal(e) => return Err(e),
                CallOutcome::Retryable(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AtsScorerError::UpstreamService("no attempt was made".to_string())
        }))
    }
}
