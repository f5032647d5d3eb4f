//! HTTP client for the Etsy v3 seller API.
//!
//! Wraps `reqwest` with the two headers Etsy v3 requires (OAuth bearer token
//! plus `x-api-key`), a bounded request timeout, and typed deserialization.
//! There is no automatic retry: a failed page fetch surfaces to the caller of
//! the sync run.

use std::time::Duration;

use serde::Deserialize;

use crate::error::EtsyError;
use crate::shops::{parse_shop_candidates, ShopCandidate};
use crate::types::RawReceipt;

const DEFAULT_BASE_URL: &str = "https://api.etsy.com/v3/application";

/// Client for the Etsy v3 seller API.
///
/// Use [`EtsyClient::new`] for production or [`EtsyClient::with_base_url`] to
/// point at a mock server in tests.
pub struct EtsyClient {
    client: reqwest::Client,
    access_token: String,
    api_key: String,
    base_url: String,
}

/// One page of the receipts feed.
#[derive(Debug)]
pub struct ReceiptsPage {
    /// Receipts that deserialized cleanly.
    pub receipts: Vec<RawReceipt>,
    /// Size of the remote `results` list, including entries dropped by the
    /// lenient per-receipt parse. Pagination terminates on an empty remote
    /// list, so termination must consult this count, not `receipts.len()`.
    pub total_fetched: usize,
}

#[derive(Debug, Deserialize)]
struct ReceiptsEnvelope {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl EtsyClient {
    /// Creates a new client pointed at the production Etsy API.
    ///
    /// `api_key` is the application keystring sent as `x-api-key`;
    /// `access_token` is the per-account OAuth bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`EtsyError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(
        access_token: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, EtsyError> {
        Self::with_base_url(access_token, api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`EtsyError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn with_base_url(
        access_token: &str,
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, EtsyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches the shops owned by an Etsy user and normalizes the payload
    /// into a uniform candidate list (the endpoint has returned bare-object,
    /// bare-list, and results-wrapped shapes).
    ///
    /// # Errors
    ///
    /// - [`EtsyError::Http`] on network failure or non-2xx HTTP status.
    /// - [`EtsyError::Deserialize`] if the body is not valid JSON.
    pub async fn user_shops(&self, user_id: i64) -> Result<Vec<ShopCandidate>, EtsyError> {
        let url = format!("{}/users/{user_id}/shops", self.base_url);
        let body = self.request_json(&url, &[]).await?;
        Ok(parse_shop_candidates(&body))
    }

    /// Fetches one page of a shop's receipts.
    ///
    /// `min_created` (epoch seconds) lets the remote side pre-filter old
    /// receipts. Receipts that fail to deserialize individually are dropped
    /// with a warning rather than failing the page.
    ///
    /// # Errors
    ///
    /// - [`EtsyError::Http`] on network failure or non-2xx HTTP status.
    /// - [`EtsyError::Deserialize`] if the envelope does not match the
    ///   expected shape.
    pub async fn shop_receipts(
        &self,
        shop_id: i64,
        limit: u32,
        offset: u32,
        min_created: Option<i64>,
    ) -> Result<ReceiptsPage, EtsyError> {
        let url = format!("{}/shops/{shop_id}/receipts", self.base_url);

        let mut params = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        if let Some(min_created) = min_created {
            params.push(("min_created".to_string(), min_created.to_string()));
        }

        let body = self.request_json(&url, &params).await?;
        let envelope: ReceiptsEnvelope =
            serde_json::from_value(body).map_err(|e| EtsyError::Deserialize {
                context: format!("shopReceipts(shop_id={shop_id}, offset={offset})"),
                source: e,
            })?;

        let total_fetched = envelope.results.len();
        let receipts = envelope
            .results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawReceipt>(value) {
                Ok(receipt) => Some(receipt),
                Err(e) => {
                    tracing::warn!(shop_id, error = %e, "dropping malformed receipt entry");
                    None
                }
            })
            .collect();

        Ok(ReceiptsPage {
            receipts,
            total_fetched,
        })
    }

    /// Sends a GET request with auth headers, asserts a 2xx status, and
    /// parses the response body as JSON.
    async fn request_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, EtsyError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("x-api-key", &self.api_key)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| EtsyError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
