//! Curator — single entry point that always yields a recommendation

use std::sync::Arc;
use std::time::Duration;

use crate::config::{DEFAULT_TIMEOUT_MS, OracleConfig};
use crate::fallback;
use crate::gemini::GeminiService;
use crate::service::RecommendationService;
use crate::types::{Recommendation, RecommendationRequest};

enum Backend {
    /// No credential; every request gets the offline pick
    NotConfigured,
    Ready(Arc<dyn RecommendationService>),
    /// Credential present but the client could not be built
    Unavailable(String),
}

/// Wraps the service with the fallback chain
pub struct Curator {
    backend: Backend,
    deadline: Duration,
}

impl Curator {
    /// Curator for the given configuration
    pub fn from_config(config: &OracleConfig) -> Self {
        let deadline = config.timeout();
        if !config.is_configured() {
            log::info!("[Curator] No API key configured, using offline recommendations");
            return Self {
                backend: Backend::NotConfigured,
                deadline,
            };
        }

        let backend = match GeminiService::new(config) {
            Ok(service) => Backend::Ready(Arc::new(service)),
            Err(e) => {
                log::error!("[Curator] Failed to build service client: {}", e);
                Backend::Unavailable(e.to_string())
            }
        };
        Self { backend, deadline }
    }

    /// Curator that never calls out
    pub fn offline() -> Self {
        Self {
            backend: Backend::NotConfigured,
            deadline: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Curator over an arbitrary service
    pub fn with_service(service: Arc<dyn RecommendationService>) -> Self {
        Self {
            backend: Backend::Ready(service),
            deadline: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Override the per-call deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Whether a live service is wired in
    pub fn is_live(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    /// One recommendation for the request. Never fails.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Recommendation {
        let service = match &self.backend {
            Backend::NotConfigured => return fallback::offline(request.language),
            Backend::Unavailable(reason) => {
                log::warn!("[Curator] Service unavailable ({}), using failure pick", reason);
                return fallback::failure(request.language);
            }
            Backend::Ready(service) => service,
        };

        match tokio::time::timeout(self.deadline, service.fetch(request)).await {
            Ok(Ok(recommendation)) => {
                log::debug!(
                    "[Curator] {} recommended '{}'",
                    service.name(),
                    recommendation.item_name
                );
                recommendation
            }
            Ok(Err(e)) => {
                log::warn!("[Curator] {} failed: {}", service.name(), e);
                fallback::failure(request.language)
            }
            Err(_) => {
                log::warn!(
                    "[Curator] {} timed out after {:?}",
                    service.name(),
                    self.deadline
                );
                fallback::failure(request.language)
            }
        }
    }
}

impl std::fmt::Debug for Curator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            Backend::NotConfigured => "not-configured".to_string(),
            Backend::Ready(service) => format!("ready({})", service.name()),
            Backend::Unavailable(reason) => format!("unavailable({reason})"),
        };
        f.debug_struct("Curator")
            .field("backend", &backend)
            .field("deadline", &self.deadline)
            .finish()
    }
}
