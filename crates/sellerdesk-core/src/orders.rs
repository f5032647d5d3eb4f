use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::OrderStatus;

/// A receipt from the remote order feed, normalized for storage and
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOrder {
    /// Remote receipt identifier; the local upsert key.
    pub external_order_id: i64,
    pub buyer_name: String,
    pub buyer_email: String,
    /// Order total in currency minor units; absent when the payload carried
    /// no price-bearing key.
    pub total_amount: Option<i64>,
    pub currency: String,
    pub order_created_at: Option<DateTime<Utc>>,
    /// The remote shipped flag. A status floor, not an overwrite — see
    /// [`crate::status::reconcile`].
    pub is_shipped: bool,
    /// Shipping notification time, only populated for shipped receipts.
    pub shipped_at: Option<DateTime<Utc>>,
    /// Empty string means "no shipment to upsert".
    pub tracking_number: String,
    pub carrier_name: String,
    pub line_items: Vec<NormalizedLineItem>,
}

impl NormalizedOrder {
    /// The status floor implied by the receipt alone, before any carrier
    /// signal is considered.
    #[must_use]
    pub fn implied_status(&self) -> OrderStatus {
        if self.is_shipped {
            OrderStatus::Shipped
        } else {
            OrderStatus::Received
        }
    }

    /// Returns `true` when a tracking number is present and a carrier lookup
    /// is worth attempting.
    #[must_use]
    pub fn has_tracking(&self) -> bool {
        !self.tracking_number.is_empty()
    }
}

/// A line item extracted from a receipt's transactions list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLineItem {
    pub external_listing_id: Option<i64>,
    pub title: String,
    pub quantity: Option<i32>,
    /// Price in currency minor units.
    pub price_amount: Option<i64>,
    pub price_currency: String,
}
