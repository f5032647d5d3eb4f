//! Outbound delivery notifications.
//!
//! The sync pass invokes the notifier exactly once per order transitioning
//! into delivered (guarded by `Transition::newly_delivered`). Delivery of the
//! notification itself is best-effort: implementations must absorb their own
//! failures — a notification problem never aborts a sync run, and there is no
//! exactly-once guarantee beyond the transition guard.

/// Channel for telling a buyer (or the seller's tooling) that an order was
/// delivered.
#[allow(async_fn_in_trait)]
pub trait DeliveryNotifier {
    async fn order_delivered(&self, external_order_id: i64, buyer_email: &str);
}

/// Notifier that only logs. The Etsy messaging integration is not wired up
/// yet; this keeps the call site and its fire-once guard in place.
pub struct NoopNotifier;

impl DeliveryNotifier for NoopNotifier {
    async fn order_delivered(&self, external_order_id: i64, _buyer_email: &str) {
        tracing::info!(
            external_order_id,
            "order delivered; no notification channel configured"
        );
    }
}
