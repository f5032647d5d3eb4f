use thiserror::Error;

/// Errors returned by the ShipEntegra API client.
///
/// The sync orchestrator absorbs every variant: a failed carrier lookup is
/// "no signal" for the affected order, never a failed run.
#[derive(Debug, Error)]
pub enum ShipentegraError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No client credentials are configured; lookups cannot authenticate.
    #[error("ShipEntegra client credentials are not configured")]
    MissingCredentials,

    /// The token exchange completed but did not yield a usable access token.
    #[error("ShipEntegra token exchange failed: {0}")]
    AuthFailed(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
