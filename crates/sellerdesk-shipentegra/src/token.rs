//! Bearer-token provider for the ShipEntegra API.
//!
//! Tokens come from a client-credentials exchange and are cached in-process
//! until shortly before their stated validity ends. A cached, unexpired token
//! is always preferred over a refresh; concurrent callers may race to
//! refresh, which at worst performs one redundant exchange.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::ShipentegraError;
use crate::types::TokenResponse;

/// Refresh this many seconds before the token's stated expiry.
const TOKEN_TTL_BUFFER_SECS: i64 = 60;
/// TTL assumed when the validity field is missing or unparsable.
const TOKEN_TTL_FALLBACK_SECS: i64 = 30 * 60;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Holds the client credentials and the cached `{token, expires_at}` pair.
pub struct TokenProvider {
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    #[must_use]
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            cached: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, refreshing via the token-exchange
    /// endpoint only when the cached one is absent or expired.
    ///
    /// # Errors
    ///
    /// - [`ShipentegraError::MissingCredentials`] when no client credentials
    ///   are configured.
    /// - [`ShipentegraError::Http`] on a failed exchange request.
    /// - [`ShipentegraError::AuthFailed`] when the exchange response carries
    ///   no access token.
    pub async fn bearer_token(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<String, ShipentegraError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if !cached.is_expired() {
                return Ok(cached.token.clone());
            }
        }

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ShipentegraError::MissingCredentials);
        }

        let url = format!("{base_url}/auth/token");
        let response = http
            .post(&url)
            .json(&serde_json::json!({
                "clientId": self.client_id,
                "clientSecret": self.client_secret,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(ShipentegraError::Http)?;

        let data = body
            .data
            .ok_or_else(|| ShipentegraError::AuthFailed("response carried no data".to_string()))?;
        let token = data
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ShipentegraError::AuthFailed("response carried no access token".to_string())
            })?;

        let ttl = parse_validity_secs(data.access_token_validity.as_ref());
        let expires_at =
            Utc::now() + chrono::Duration::seconds((ttl - TOKEN_TTL_BUFFER_SECS).max(60));

        *self.cached.write().await = Some(CachedToken {
            token: token.clone(),
            expires_at,
        });

        Ok(token)
    }
}

/// Parses the `accessTokenValidity` field into seconds.
///
/// Accepts a plain integer, an all-digit string, or a colon-separated
/// `H:M:S` / `M:S` duration string. Anything else falls back to
/// [`TOKEN_TTL_FALLBACK_SECS`].
fn parse_validity_secs(value: Option<&serde_json::Value>) -> i64 {
    let Some(value) = value else {
        return TOKEN_TTL_FALLBACK_SECS;
    };

    if let Some(secs) = value.as_i64() {
        return secs;
    }

    if let Some(text) = value.as_str() {
        let text = text.trim();
        let parts: Vec<&str> = text.split(':').collect();
        if parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
            let values: Vec<i64> = parts.iter().filter_map(|p| p.parse().ok()).collect();
            match values.as_slice() {
                [secs] => return *secs,
                [minutes, seconds] => return minutes * 60 + seconds,
                [hours, minutes, seconds] => return hours * 3600 + minutes * 60 + seconds,
                _ => {}
            }
        }
    }

    TOKEN_TTL_FALLBACK_SECS
}
