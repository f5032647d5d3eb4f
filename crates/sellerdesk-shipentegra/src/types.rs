//! ShipEntegra API wire types.
//!
//! The tracking payload is loosely specified and varies by carrier, so every
//! field is optional; classification of the free text happens in
//! [`crate::normalize`].

use serde::{Deserialize, Serialize};

/// Response of `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenData {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token lifetime; arrives as a plain integer of seconds or as a
    /// colon-separated `H:M:S` / `M:S` duration string depending on the
    /// API version.
    #[serde(default)]
    pub access_token_validity: Option<serde_json::Value>,
}

/// Response of `GET /logistics/shipments/activities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitiesPayload {
    /// `"success"` on a usable response; anything else means no signal.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<ActivitiesData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitiesData {
    /// Carrier status text, e.g. `"In Transit"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "deliveryDate")]
    pub delivery_date: Option<serde_json::Value>,
    /// Carrier scan events, oldest first; the last entry is the most recent.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub event: Option<String>,
}
