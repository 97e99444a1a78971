//! OAuth client-credentials token provider
//!
//! Fetches bearer tokens from the identity provider's token endpoint and
//! caches them in memory. A token is reused until it comes within the
//! expiry margin of its lifetime, at which point the next caller refreshes
//! it; concurrent callers coalesce into a single upstream request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use procura_domain::constants::TOKEN_EXPIRY_MARGIN;
use procura_domain::{AuthError, IdentityConfig};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, refreshing if needed.
    async fn access_token(&self) -> Result<String, AuthError>;
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// A token is fresh while it stays outside the expiry margin.
    fn is_fresh(&self, now: Instant, margin: Duration) -> bool {
        now + margin < self.expires_at
    }
}

/// Client-credentials token provider with a shared in-memory cache
pub struct IdentityTokenProvider {
    http: HttpClient,
    config: IdentityConfig,
    token_url: String,
    margin: Duration,
    cached: tokio::sync::RwLock<Option<CachedToken>>,
    // Serializes refreshes so concurrent stale callers make one request
    refresh_lock: tokio::sync::Mutex<()>,
}

impl IdentityTokenProvider {
    /// Create a provider from identity configuration.
    ///
    /// # Errors
    /// Returns `AuthError::Config` when any required field is empty.
    pub fn new(config: IdentityConfig, http: HttpClient) -> Result<Self, AuthError> {
        validate(&config)?;
        let token_url = token_url(&config.domain);
        Ok(Self {
            http,
            config,
            token_url,
            margin: TOKEN_EXPIRY_MARGIN,
            cached: tokio::sync::RwLock::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
        })
    }

    async fn fetch_token(&self) -> Result<CachedToken, AuthError> {
        let body = TokenRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            audience: &self.config.audience,
            grant_type: "client_credentials",
        };

        debug!(url = %self.token_url, "requesting access token");

        let request = self.http.request(Method::POST, &self.token_url).json(&body);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| AuthError::Request(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Request(format!(
                "token endpoint returned status {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Request(format!("invalid token response: {e}")))?;

        info!(expires_in = token.expires_in, "access token issued");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for IdentityTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        // Fast path: a fresh cached token needs no locking beyond the read
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(Instant::now(), self.margin) {
                return Ok(token.access_token.clone());
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(Instant::now(), self.margin) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *self.cached.write().await = Some(token);
        Ok(access_token)
    }
}

fn validate(config: &IdentityConfig) -> Result<(), AuthError> {
    for (field, value) in [
        ("domain", &config.domain),
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("audience", &config.audience),
    ] {
        if value.trim().is_empty() {
            return Err(AuthError::Config(format!("identity {field} must not be empty")));
        }
    }
    Ok(())
}

/// Bare issuer domains get an https scheme; explicit schemes pass through
/// so tests can point at a local server.
fn token_url(domain: &str) -> String {
    let base = if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", domain.trim_end_matches('/'))
    };
    format!("{base}/oauth/token")
}
