//! Screening API client with retry and circuit breaking
//!
//! One logical screening call runs inside the circuit breaker; the retry
//! executor governs transport attempts inside that call. The bearer token is
//! fetched inside the retried closure so every attempt carries a current
//! token.
//!
//! Only retryable failures count toward opening the circuit. Caller faults
//! (4xx other than 408/429, auth failures) surface immediately and leave
//! breaker state untouched.

use std::sync::Arc;

use async_trait::async_trait;
use procura_common::resilience::{
    CircuitBreaker, CircuitBreakerConfig, ResilienceError, RetryConfig, RetryDecision,
    RetryError, RetryExecutor,
};
use procura_core::ScreeningGateway;
use procura_domain::{
    ProcuraError, ScreeningConfig, ScreeningError, ScreeningRequest, ScreeningResult,
};
use reqwest::{Method, Response, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::types::{ApiErrorBody, ScreeningRequestBody, ScreeningResultBody};
use crate::auth::AccessTokenProvider;
use crate::http::HttpClient;

type ScreeningPolicy = fn(&ScreeningError, u32) -> RetryDecision;

fn retry_policy(error: &ScreeningError, _attempt: u32) -> RetryDecision {
    if error.is_retryable() {
        RetryDecision::Retry
    } else {
        RetryDecision::Stop
    }
}

/// HTTP client for the external screening API
pub struct ScreeningClient {
    http: HttpClient,
    base_url: String,
    auth: Arc<dyn AccessTokenProvider>,
    breaker: CircuitBreaker,
    retry: RetryExecutor<ScreeningPolicy>,
}

impl ScreeningClient {
    /// Build a client from screening configuration.
    ///
    /// # Errors
    /// Returns `ProcuraError::Config` when the base URL is invalid or the
    /// resilience configuration is rejected.
    pub fn new(
        config: &ScreeningConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ProcuraError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ProcuraError::Config(format!("invalid screening base URL: {e}")))?;

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(concat!("procura/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProcuraError::Config(format!("failed to build HTTP client: {e}")))?;

        let breaker = CircuitBreaker::new(CircuitBreakerConfig::new(
            config.breaker_failure_threshold,
            config.breaker_cooldown(),
        ))
        .map_err(|e| ProcuraError::Config(e.to_string()))?;

        let retry = RetryExecutor::new(
            RetryConfig::new(config.max_retries, config.backoff_base()),
            retry_policy as ScreeningPolicy,
        );

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            auth,
            breaker,
            retry,
        })
    }

    async fn attempt(
        &self,
        url: &str,
        body: &ScreeningRequestBody,
    ) -> Result<ScreeningResult, ScreeningError> {
        let token = self.auth.access_token().await?;

        let request = self.http.request(Method::POST, url).bearer_auth(token).json(body);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| ScreeningError::transport("screening request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        let parsed: ScreeningResultBody = response
            .json()
            .await
            .map_err(|e| ScreeningError::transport("unparsable screening response", e))?;

        parsed
            .into_result()
            .ok_or_else(|| ScreeningError::transport_msg("screening API returned an empty result"))
    }

    async fn status_error(status: StatusCode, response: Response) -> ScreeningError {
        let header_retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let text = response.text().await.unwrap_or_default();
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&text).ok();

        let message = parsed.as_ref().and_then(ApiErrorBody::message).unwrap_or_else(|| {
            if text.is_empty() {
                format!("screening API returned status {status}")
            } else {
                text.clone()
            }
        });

        let retry_after_secs =
            header_retry_after.or_else(|| parsed.as_ref().and_then(ApiErrorBody::retry_after));

        ScreeningError::Api { status: status.as_u16(), message, retry_after_secs }
    }
}

#[async_trait]
impl ScreeningGateway for ScreeningClient {
    #[instrument(skip(self, request), fields(supplier_id = %request.supplier_id))]
    async fn screen(
        &self,
        request: &ScreeningRequest,
    ) -> Result<ScreeningResult, ScreeningError> {
        let url = format!("{}/api/screening/screen", self.base_url);
        let body = ScreeningRequestBody::from_request(request);

        debug!(entity = %request.entity_name, sources = request.sources.len(), "starting screening call");

        // Aborted means the retry policy classified the error as
        // non-retryable; such failures must not open the circuit.
        let outcome = self
            .breaker
            .execute_classified(
                || self.retry.execute(|| self.attempt(&url, &body)),
                |error| !matches!(error, RetryError::Aborted { .. }),
            )
            .await;

        match outcome {
            Ok(result) => {
                info!(
                    entity = %result.searched_entity,
                    total_hits = result.total_hits,
                    warnings = result.warnings.len(),
                    "screening call completed"
                );
                Ok(result)
            }
            Err(ResilienceError::CircuitOpen) => {
                warn!("screening call rejected, circuit is open");
                Err(ScreeningError::CircuitOpen)
            }
            Err(ResilienceError::OperationFailed { source }) => {
                let error = source.into_source();
                warn!(error = %error, "screening call failed");
                Err(error)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/screening/health", self.base_url);
        match self.http.send(self.http.request(Method::GET, &url)).await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(status = %response.status(), "screening API health check degraded");
                false
            }
            Err(error) => {
                warn!(error = %error, "screening API health check failed");
                false
            }
        }
    }
}
