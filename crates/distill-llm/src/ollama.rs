//! Ollama Provider Implementation
//!
//! Extraction against Ollama's local LLM API.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff for transport failures
//!
//! # Examples
//!
//! ```no_run
//! use distill_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama2");
//! ```

use crate::prompt::PromptBuilder;
use crate::ProviderError;
use distill_domain::traits::ExtractionProvider;
use distill_domain::ModelSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single HTTP request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts for transport failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local model inference
///
/// Transport errors are retried with exponential backoff; a response the model
/// actually produced is never re-asked (retry-on-bad-content belongs to no
/// layer of this pipeline).
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: String,
}

/// Response from the Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama2", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Run an extraction prompt through the Ollama generate API
    ///
    /// # Errors
    ///
    /// Returns an error if Ollama is not running, the model is not available,
    /// network communication fails, or the response body is malformed.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: "json".to_string(),
        };

        // Retry transport failures with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<OllamaGenerateResponse>().await {
                            Ok(ollama_response) => {
                                return Ok(ollama_response.response);
                            }
                            Err(e) => {
                                return Err(ProviderError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                )));
                            }
                        }
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(ProviderError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(ProviderError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error =
                        Some(ProviderError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::Communication("Max retries exceeded".to_string())))
    }
}

impl ExtractionProvider for OllamaProvider {
    type Error = ProviderError;

    fn extract(&self, content: &str, spec: &ModelSpec) -> Result<String, Self::Error> {
        let prompt = PromptBuilder::new(content, spec.clone()).build();

        // Blocking wrapper: the worker invokes providers on blocking threads
        tokio::runtime::Runtime::new()
            .map_err(|e| ProviderError::Other(format!("Runtime error: {}", e)))?
            .block_on(async { self.generate(&prompt).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama2");
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "llama2");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, "mistral");
    }

    #[test]
    fn test_ollama_provider_with_max_retries() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama2").with_max_retries(5);
        assert_eq!(provider.max_retries, 5);
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Invalid endpoint to trigger a transport error
        let provider = OllamaProvider::new("http://localhost:1", "llama2").with_max_retries(1);

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(ProviderError::Communication(_))));
    }

    // Integration test (requires running Ollama)
    #[tokio::test]
    #[ignore]
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama2");
        let result = provider.generate("Return the JSON object {\"ok\": true}").await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }
}
