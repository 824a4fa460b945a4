//! Google Workspace Authentication
//!
//! Handles authentication using Application Default Credentials (ADC),
//! service account keys, or gcloud CLI credentials.

use anyhow::{Context, Result};
use gcp_auth::TokenProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Read-only scopes for the Admin SDK Directory API
pub const DIRECTORY_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/admin.directory.user.readonly",
    "https://www.googleapis.com/auth/admin.directory.group.readonly",
    "https://www.googleapis.com/auth/admin.directory.group.member.readonly",
    "https://www.googleapis.com/auth/admin.directory.orgunit.readonly",
    "https://www.googleapis.com/auth/admin.directory.user.security",
];

/// Token expiry buffer - refresh tokens this much before they actually expire
/// This prevents using tokens that are about to expire during a request
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Lifetime assigned to caller-supplied static tokens. The connector never
/// refreshes these; the host owns their rotation.
const STATIC_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Workspace credentials holder with token caching
#[derive(Clone)]
pub struct DirectoryCredentials {
    provider: Option<Arc<dyn TokenProvider>>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    /// Check if this cached token is still valid
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl DirectoryCredentials {
    /// Create new Workspace credentials using Application Default Credentials
    pub async fn new() -> Result<Self> {
        let provider = gcp_auth::provider().await.context(
            "Failed to initialize Google Workspace authentication. Run 'gcloud auth application-default login' or set GOOGLE_APPLICATION_CREDENTIALS",
        )?;

        Ok(Self {
            provider: Some(provider),
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Wrap a pre-issued access token. Used by hosts that manage their own
    /// credential lifecycle, and by the integration tests.
    pub fn with_static_token(token: &str) -> Self {
        let cached = CachedToken {
            token: token.to_string(),
            expires_at: Instant::now() + STATIC_TOKEN_TTL,
        };

        Self {
            provider: None,
            token_cache: Arc::new(RwLock::new(Some(cached))),
        }
    }

    /// Get an access token for API calls
    /// Checks token expiry before returning a cached token
    pub async fn get_token(&self) -> Result<String> {
        // Check cache first - but only return if token is still valid
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let Some(provider) = self.provider.as_ref() else {
            anyhow::bail!("Static access token expired and no credential provider is configured");
        };

        // Fetch new token
        let token = provider
            .token(DIRECTORY_SCOPES)
            .await
            .context("Failed to get access token for the Directory API")?;

        let token_str = token.as_str().to_string();

        // gcp_auth does not always expose expiry, so use a conservative TTL
        let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token_str.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            (DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token_str)
    }

    /// Force refresh the token
    pub async fn refresh_token(&self) -> Result<String> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }

        self.get_token().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_is_returned_without_a_provider() {
        let credentials = DirectoryCredentials::with_static_token("test-token");
        let token = credentials.get_token().await.unwrap();
        assert_eq!(token, "test-token");
    }

    #[tokio::test]
    async fn refreshing_a_static_token_fails_without_a_provider() {
        let credentials = DirectoryCredentials::with_static_token("test-token");
        assert!(credentials.refresh_token().await.is_err());
    }

    #[test]
    fn directory_scopes_are_read_only() {
        for scope in DIRECTORY_SCOPES {
            assert!(
                scope.ends_with(".readonly") || scope.ends_with(".security"),
                "unexpected scope: {scope}"
            );
        }
    }
}
