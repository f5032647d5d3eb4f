//! Raw Etsy v3 receipt payload types.
//!
//! Every field is `#[serde(default)]`: the receipts feed is inconsistent
//! about which fields it includes, and a missing field must never fail a
//! sync run. Shape normalization (price priority, tracking fallback) happens
//! in [`crate::normalize`], not here.

use serde::Deserialize;

/// An Etsy money object: integer amount in minor units plus currency code.
#[derive(Debug, Clone, Deserialize)]
pub struct Money {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// A shipment sub-object nested in a receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReceiptShipment {
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub carrier_name: Option<String>,
    /// Epoch seconds of the buyer shipping notification.
    #[serde(default)]
    pub shipment_notification_timestamp: Option<i64>,
}

/// A line-item transaction nested in a receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub listing_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub price: Option<Money>,
}

/// One raw receipt from `GET /shops/{shop_id}/receipts`.
///
/// The price can arrive under any of `total_price`, `grandtotal`, or `price`;
/// extraction priority lives in [`crate::normalize::map_receipt`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawReceipt {
    #[serde(default)]
    pub receipt_id: Option<i64>,
    /// Buyer display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub buyer_email: Option<String>,
    #[serde(default)]
    pub total_price: Option<Money>,
    #[serde(default)]
    pub grandtotal: Option<Money>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub is_shipped: Option<bool>,
    /// Epoch seconds.
    #[serde(default)]
    pub created_timestamp: Option<i64>,
    #[serde(default)]
    pub shipments: Vec<RawReceiptShipment>,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub carrier_name: Option<String>,
}
