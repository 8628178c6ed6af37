//! The per-document extraction worker

use crate::error::ExtractorError;
use crate::parser::parse_record;
use distill_domain::traits::ExtractionProvider;
use distill_domain::{DocumentRef, ExtractionOutcome, ModelSpec, StructuredRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Invokes the extraction provider for one document at a time
///
/// Converts every raw failure into a typed [`ExtractionOutcome::Failure`] so
/// one bad document never aborts the batch. The deadline covers the provider
/// call only, not the file read.
pub struct ExtractionWorker<P>
where
    P: ExtractionProvider,
{
    provider: Arc<P>,
    spec: ModelSpec,
}

impl<P> ExtractionWorker<P>
where
    P: ExtractionProvider + Send + Sync + 'static,
    P::Error: std::fmt::Display,
{
    /// Create a worker around a provider and the target model spec
    pub fn new(provider: P, spec: ModelSpec) -> Self {
        Self {
            provider: Arc::new(provider),
            spec,
        }
    }

    /// The model spec this worker validates against
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Shared handle to the underlying provider
    pub fn provider(&self) -> Arc<P> {
        Arc::clone(&self.provider)
    }

    /// Process one document to a terminal outcome
    ///
    /// Reads the document from disk first; a read failure is an `Io` outcome
    /// and the provider is never called for that document.
    pub async fn extract(&self, doc: &DocumentRef, deadline: Duration) -> ExtractionOutcome {
        let content = match tokio::fs::read_to_string(&doc.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read '{}': {}", doc.path.display(), e);
                return self.failure(doc, ExtractorError::Io(e));
            }
        };

        self.extract_content(doc, &content, deadline).await
    }

    /// Process already-read content to a terminal outcome
    pub async fn extract_content(
        &self,
        doc: &DocumentRef,
        content: &str,
        deadline: Duration,
    ) -> ExtractionOutcome {
        debug!("Extracting '{}' ({} chars)", doc.id, content.len());

        match self.try_extract(content, deadline).await {
            Ok(record) => ExtractionOutcome::Success {
                doc: doc.clone(),
                record,
            },
            Err(e) => self.failure(doc, e),
        }
    }

    async fn try_extract(
        &self,
        content: &str,
        deadline: Duration,
    ) -> Result<StructuredRecord, ExtractorError> {
        let response = timeout(deadline, self.call_provider(content))
            .await
            .map_err(|_| ExtractorError::Timeout(deadline.as_secs()))??;

        debug!("Provider response length: {} chars", response.len());

        let value = parse_record(&response)?;

        self.spec
            .validate(&value)
            .map_err(ExtractorError::InvalidRecord)?;

        Ok(StructuredRecord::new(value))
    }

    /// Call the provider on a blocking thread
    ///
    /// Providers are synchronous; the call may block on network I/O for the
    /// full model latency.
    async fn call_provider(&self, content: &str) -> Result<String, ExtractorError> {
        let provider = Arc::clone(&self.provider);
        let spec = self.spec.clone();
        let content = content.to_string();

        tokio::task::spawn_blocking(move || {
            provider
                .extract(&content, &spec)
                .map_err(|e| ExtractorError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Provider(format!("Task join error: {}", e)))?
    }

    fn failure(&self, doc: &DocumentRef, error: ExtractorError) -> ExtractionOutcome {
        ExtractionOutcome::Failure {
            doc: doc.clone(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
