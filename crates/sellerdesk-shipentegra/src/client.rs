//! HTTP client for the ShipEntegra logistics API.

use std::time::Duration;

use crate::error::ShipentegraError;
use crate::token::TokenProvider;
use crate::types::ActivitiesPayload;

const DEFAULT_BASE_URL: &str = "https://api.shipentegra.com/v1";

/// Client for the ShipEntegra tracking API.
///
/// Holds the injected [`TokenProvider`]; every request authenticates with the
/// provider's cached bearer token, refreshing only on expiry.
pub struct ShipentegraClient {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenProvider,
}

impl ShipentegraClient {
    /// Creates a new client pointed at the production ShipEntegra API.
    ///
    /// # Errors
    ///
    /// Returns [`ShipentegraError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        client_id: &str,
        client_secret: &str,
        timeout_secs: u64,
    ) -> Result<Self, ShipentegraError> {
        Self::with_base_url(client_id, client_secret, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (configured deployments
    /// and wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`ShipentegraError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        client_id: &str,
        client_secret: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ShipentegraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            tokens: TokenProvider::new(client_id, client_secret),
        })
    }

    /// Looks up the tracking activities for one shipment.
    ///
    /// # Errors
    ///
    /// - [`ShipentegraError::MissingCredentials`] / [`ShipentegraError::AuthFailed`]
    ///   when a bearer token cannot be obtained.
    /// - [`ShipentegraError::Http`] on network failure or non-2xx status.
    /// - [`ShipentegraError::Deserialize`] if the body is not the expected shape.
    pub async fn shipment_activities(
        &self,
        tracking_number: &str,
    ) -> Result<ActivitiesPayload, ShipentegraError> {
        let token = self.tokens.bearer_token(&self.client, &self.base_url).await?;

        let url = format!("{}/logistics/shipments/activities", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .query(&[("trackingNumber", tracking_number)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ShipentegraError::Deserialize {
            context: format!("shipmentActivities(trackingNumber={tracking_number})"),
            source: e,
        })
    }
}
