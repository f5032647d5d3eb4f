use thiserror::Error;

/// Errors returned by the Etsy API client.
#[derive(Debug, Error)]
pub enum EtsyError {
    /// Network or TLS failure, or a non-2xx HTTP status from Etsy.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
