//! Normalization of raw Etsy receipts into the local record shape.

use chrono::{DateTime, Utc};
use sellerdesk_core::{NormalizedLineItem, NormalizedOrder};

use crate::types::{Money, RawReceipt};

/// Converts one raw receipt into a [`NormalizedOrder`].
///
/// Returns `None` when the receipt has no `receipt_id`; such receipts are
/// skipped entirely — they count as neither success nor failure. Every other
/// missing field degrades to an empty/absent value rather than an error.
#[must_use]
pub fn map_receipt(receipt: &RawReceipt) -> Option<NormalizedOrder> {
    let external_order_id = receipt.receipt_id?;

    let (total_amount, currency) = extract_price(receipt);
    let is_shipped = receipt.is_shipped.unwrap_or(false);

    let shipped_at = if is_shipped {
        receipt
            .shipments
            .first()
            .and_then(|s| s.shipment_notification_timestamp)
            .and_then(epoch_to_datetime)
    } else {
        None
    };

    let (tracking_number, carrier_name) = extract_tracking(receipt);

    let line_items = receipt
        .transactions
        .iter()
        .map(|tx| NormalizedLineItem {
            external_listing_id: tx.listing_id,
            title: tx.title.clone().unwrap_or_default(),
            quantity: tx.quantity,
            price_amount: tx.price.as_ref().and_then(|p| p.amount),
            price_currency: money_currency(tx.price.as_ref()),
        })
        .collect();

    Some(NormalizedOrder {
        external_order_id,
        buyer_name: receipt.name.clone().unwrap_or_default(),
        buyer_email: receipt.buyer_email.clone().unwrap_or_default(),
        total_amount,
        currency,
        order_created_at: receipt.created_timestamp.and_then(epoch_to_datetime),
        is_shipped,
        shipped_at,
        tracking_number,
        carrier_name,
        line_items,
    })
}

/// Extracts the receipt total, trying price-bearing keys in fixed priority
/// order: `total_price`, then `grandtotal`, then `price`. The first key
/// present wins; none present yields `(None, "")`.
fn extract_price(receipt: &RawReceipt) -> (Option<i64>, String) {
    for money in [&receipt.total_price, &receipt.grandtotal, &receipt.price] {
        if let Some(money) = money {
            return (money.amount, money_currency(Some(money)));
        }
    }
    (None, String::new())
}

/// Tracking number and carrier name: top-level fields first, falling back to
/// the first shipment sub-object. Both degrade to empty strings.
fn extract_tracking(receipt: &RawReceipt) -> (String, String) {
    let first_shipment = receipt.shipments.first();

    let tracking = receipt
        .tracking_code
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| first_shipment.and_then(|s| s.tracking_code.clone()))
        .unwrap_or_default();

    let carrier = receipt
        .carrier_name
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| first_shipment.and_then(|s| s.carrier_name.clone()))
        .unwrap_or_default();

    (tracking, carrier)
}

fn money_currency(money: Option<&Money>) -> String {
    money
        .and_then(|m| m.currency_code.clone())
        .unwrap_or_default()
}

/// Interprets a numeric timestamp as UTC epoch seconds.
fn epoch_to_datetime(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawReceiptShipment, RawTransaction};

    fn receipt_from_json(value: serde_json::Value) -> RawReceipt {
        serde_json::from_value(value).expect("test receipt should deserialize")
    }

    #[test]
    fn receipt_without_id_is_skipped() {
        let receipt = receipt_from_json(serde_json::json!({"name": "A Buyer"}));
        assert!(map_receipt(&receipt).is_none());
    }

    #[test]
    fn grandtotal_wins_when_total_price_is_absent() {
        let receipt = receipt_from_json(serde_json::json!({
            "receipt_id": 1,
            "grandtotal": {"amount": 2599, "currency_code": "USD"},
            "price": {"amount": 1, "currency_code": "EUR"}
        }));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.total_amount, Some(2599));
        assert_eq!(order.currency, "USD");
    }

    #[test]
    fn total_price_takes_priority_over_grandtotal() {
        let receipt = receipt_from_json(serde_json::json!({
            "receipt_id": 1,
            "total_price": {"amount": 3000, "currency_code": "GBP"},
            "grandtotal": {"amount": 2599, "currency_code": "USD"}
        }));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.total_amount, Some(3000));
        assert_eq!(order.currency, "GBP");
    }

    #[test]
    fn missing_price_keys_yield_none_and_empty_currency() {
        let receipt = receipt_from_json(serde_json::json!({"receipt_id": 1}));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.total_amount, None);
        assert_eq!(order.currency, "");
    }

    #[test]
    fn created_timestamp_is_epoch_seconds_utc() {
        let receipt = receipt_from_json(serde_json::json!({
            "receipt_id": 1,
            "created_timestamp": 1_700_000_000
        }));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(
            order.order_created_at.unwrap().timestamp(),
            1_700_000_000
        );
    }

    #[test]
    fn shipped_at_comes_from_first_shipment_when_shipped() {
        let receipt = RawReceipt {
            receipt_id: Some(5),
            is_shipped: Some(true),
            shipments: vec![RawReceiptShipment {
                tracking_code: Some("TRK1".to_string()),
                carrier_name: Some("usps".to_string()),
                shipment_notification_timestamp: Some(1_700_000_100),
            }],
            ..receipt_from_json(serde_json::json!({"receipt_id": 5}))
        };
        let order = map_receipt(&receipt).unwrap();
        assert!(order.is_shipped);
        assert_eq!(order.shipped_at.unwrap().timestamp(), 1_700_000_100);
    }

    #[test]
    fn shipped_at_is_absent_when_not_shipped() {
        let receipt = RawReceipt {
            receipt_id: Some(5),
            is_shipped: Some(false),
            shipments: vec![RawReceiptShipment {
                tracking_code: None,
                carrier_name: None,
                shipment_notification_timestamp: Some(1_700_000_100),
            }],
            ..receipt_from_json(serde_json::json!({"receipt_id": 5}))
        };
        let order = map_receipt(&receipt).unwrap();
        assert!(order.shipped_at.is_none());
    }

    #[test]
    fn tracking_falls_back_to_first_shipment() {
        let receipt = receipt_from_json(serde_json::json!({
            "receipt_id": 2,
            "shipments": [
                {"tracking_code": "SHP-9", "carrier_name": "dhl"},
                {"tracking_code": "SHP-LATER"}
            ]
        }));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.tracking_number, "SHP-9");
        assert_eq!(order.carrier_name, "dhl");
    }

    #[test]
    fn top_level_tracking_wins_over_shipments() {
        let receipt = receipt_from_json(serde_json::json!({
            "receipt_id": 2,
            "tracking_code": "TOP-1",
            "carrier_name": "ups",
            "shipments": [{"tracking_code": "SHP-9", "carrier_name": "dhl"}]
        }));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.tracking_number, "TOP-1");
        assert_eq!(order.carrier_name, "ups");
    }

    #[test]
    fn no_tracking_anywhere_is_empty_string() {
        let receipt = receipt_from_json(serde_json::json!({"receipt_id": 2}));
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.tracking_number, "");
        assert_eq!(order.carrier_name, "");
    }

    #[test]
    fn line_items_are_mapped_with_defensive_defaults() {
        let receipt = RawReceipt {
            receipt_id: Some(3),
            transactions: vec![
                RawTransaction {
                    listing_id: Some(900),
                    title: Some("Ceramic mug".to_string()),
                    quantity: Some(2),
                    price: Some(Money {
                        amount: Some(1250),
                        currency_code: Some("USD".to_string()),
                    }),
                },
                RawTransaction {
                    listing_id: None,
                    title: None,
                    quantity: None,
                    price: None,
                },
            ],
            ..receipt_from_json(serde_json::json!({"receipt_id": 3}))
        };
        let order = map_receipt(&receipt).unwrap();
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.line_items[0].external_listing_id, Some(900));
        assert_eq!(order.line_items[0].price_amount, Some(1250));
        assert_eq!(order.line_items[1].title, "");
        assert_eq!(order.line_items[1].price_currency, "");
    }
}
