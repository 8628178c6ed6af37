//! Distill Extraction Providers
//!
//! Pluggable implementations of the [`ExtractionProvider`] trait from
//! `distill-domain`.
//!
//! # Providers
//!
//! - [`MockProvider`]: deterministic, instrumented mock for testing
//! - [`OllamaProvider`]: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use distill_llm::MockProvider;
//! use distill_domain::{traits::ExtractionProvider, ModelSpec};
//!
//! let provider = MockProvider::new(r#"{"title": "T"}"#);
//! let spec = ModelSpec::new("Doc");
//! let result = provider.extract("document text", &spec).unwrap();
//! assert_eq!(result, r#"{"title": "T"}"#);
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod prompt;

use distill_domain::traits::ExtractionProvider;
use distill_domain::ModelSpec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use prompt::PromptBuilder;

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// Mock extraction provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls, and
/// instruments every call so tests can assert how the pipeline drove it:
/// total call count, and the high-water mark of concurrent in-flight calls.
///
/// # Examples
///
/// ```
/// use distill_llm::MockProvider;
/// use distill_domain::{traits::ExtractionProvider, ModelSpec};
///
/// let mut provider = MockProvider::new(r#"{"ok": true}"#);
/// provider.add_response("special doc", r#"{"ok": false}"#);
///
/// let spec = ModelSpec::new("Doc");
/// assert_eq!(provider.extract("special doc", &spec).unwrap(), r#"{"ok": false}"#);
/// assert_eq!(provider.extract("anything else", &spec).unwrap(), r#"{"ok": true}"#);
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a provider that answers every call with a fixed response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Add a specific response for a given document content
    pub fn add_response(&mut self, content: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(content.into(), response.into());
    }

    /// Configure the provider to fail for a specific document content
    pub fn add_error(&mut self, content: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(content.into(), "ERROR".to_string());
    }

    /// Make every call block for `delay` before answering
    ///
    /// Calls run on blocking threads, so overlapping delayed calls are what
    /// the in-flight high-water mark observes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `extract` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Highest number of calls observed in flight simultaneously
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl ExtractionProvider for MockProvider {
    type Error = ProviderError;

    fn extract(&self, content: &str, _spec: &ModelSpec) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let result = {
            let responses = self.responses.lock().unwrap();
            match responses.get(content) {
                Some(response) if response == "ERROR" => {
                    Err(ProviderError::Other("Mock error".to_string()))
                }
                Some(response) => Ok(response.clone()),
                None => Ok(self.default_response.clone()),
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
