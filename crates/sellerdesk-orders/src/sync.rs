//! The end-to-end sync run.
//!
//! One run resolves the account's shop (once), pages the receipts feed, and
//! for each receipt: normalizes, reads the prior status, upserts order +
//! items, and — when a tracking number is present — merges the carrier signal
//! through the reconciliation state machine. Failure handling is two-tier:
//! a page fetch or database failure aborts the run; anything that goes wrong
//! with a single receipt's carrier lookup is logged and absorbed.

use chrono::Utc;
use sellerdesk_core::{reconcile, AppConfig, NormalizedOrder, OrderStatus};
use sellerdesk_db::{AccountRow, TrackingUpdate};
use sellerdesk_etsy::{map_receipt, EtsyClient, ReceiptPager};
use sellerdesk_shipentegra::{normalize_tracking, ShipentegraClient};

use crate::error::SyncError;
use crate::notify::DeliveryNotifier;
use crate::store::OrderStore;

/// Tunables of one sync run.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Receipts fetched per page request.
    pub page_size: u32,
    /// Recency window passed to the remote as `min_created`.
    pub window_days: i64,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: 50,
            window_days: 30,
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.sync_page_size,
            window_days: config.sync_window_days,
        }
    }
}

/// Runs one order sync for an account and returns the number of receipts
/// processed (mapped and upserted; receipts without an order id are skipped
/// and not counted).
///
/// Receipts are processed strictly in page order, then item order within a
/// page. Pages already persisted when a later page fetch fails stay
/// committed; the failed run reports only the error.
///
/// # Errors
///
/// - [`SyncError::AccountNotFound`] / [`SyncError::MissingEtsyUserId`] /
///   [`SyncError::NoShopFound`] when the account cannot be resolved to a shop.
/// - [`SyncError::Etsy`] when shop resolution or a page fetch fails.
/// - [`SyncError::Db`] when a write fails.
pub async fn sync_orders<S, N>(
    store: &S,
    etsy: &EtsyClient,
    carrier: &ShipentegraClient,
    notifier: &N,
    account_id: i64,
    options: SyncOptions,
) -> Result<u32, SyncError>
where
    S: OrderStore,
    N: DeliveryNotifier,
{
    let account = store
        .load_account(account_id)
        .await?
        .ok_or(SyncError::AccountNotFound(account_id))?;

    let shop_id = resolve_shop(store, etsy, &account).await?;

    let min_created = (Utc::now() - chrono::Duration::days(options.window_days)).timestamp();
    let mut pager = ReceiptPager::new(etsy, shop_id, options.page_size, Some(min_created));

    let mut processed: u32 = 0;
    while let Some(receipts) = pager.next_page().await? {
        for raw in &receipts {
            let Some(order) = map_receipt(raw) else {
                tracing::debug!(shop_id, "skipping receipt without an order id");
                continue;
            };
            process_receipt(store, carrier, notifier, account_id, &order).await?;
            processed += 1;
        }
    }

    store.touch_account_synced(account_id).await?;

    tracing::info!(account_id, shop_id, processed, "order sync finished");
    Ok(processed)
}

/// Returns the account's shop id, resolving and persisting it on first use.
async fn resolve_shop<S: OrderStore>(
    store: &S,
    etsy: &EtsyClient,
    account: &AccountRow,
) -> Result<i64, SyncError> {
    if let Some(shop_id) = account.shop_id {
        return Ok(shop_id);
    }

    let user_id = account.etsy_user_id.ok_or(SyncError::MissingEtsyUserId)?;
    let candidates = etsy.user_shops(user_id).await?;
    let Some(first) = candidates.first() else {
        return Err(SyncError::NoShopFound);
    };
    if candidates.len() > 1 {
        tracing::warn!(
            count = candidates.len(),
            chosen = first.shop_id,
            "account resolves to multiple shops; using the first candidate"
        );
    }

    store
        .save_shop_identity(account.id, first.shop_id, &first.shop_name)
        .await?;

    Ok(first.shop_id)
}

/// Upserts one receipt and merges its carrier signal, if any.
async fn process_receipt<S, N>(
    store: &S,
    carrier: &ShipentegraClient,
    notifier: &N,
    account_id: i64,
    order: &NormalizedOrder,
) -> Result<(), SyncError>
where
    S: OrderStore,
    N: DeliveryNotifier,
{
    let prior = store.order_status(order.external_order_id).await?;
    let prior_status = prior.map_or(OrderStatus::Received, |(status, _)| status);

    // Receipt-only floor; the carrier signal is merged below once known.
    let floor = reconcile(prior_status, order.is_shipped, None).next;

    let now = Utc::now();
    let order_id = store.upsert_order(account_id, order, floor, now).await?;

    if !order.has_tracking() {
        return Ok(());
    }

    let tracking = match carrier.shipment_activities(&order.tracking_number).await {
        Ok(payload) => normalize_tracking(&payload),
        Err(e) => {
            tracing::warn!(
                external_order_id = order.external_order_id,
                tracking_number = %order.tracking_number,
                error = %e,
                "carrier lookup failed; keeping prior shipment state"
            );
            None
        }
    };

    let (update, newly_delivered) = match &tracking {
        Some(tracking) => {
            let transition = reconcile(floor, order.is_shipped, Some(tracking.signal));
            let update = TrackingUpdate {
                tracking_number: order.tracking_number.clone(),
                carrier_name: order.carrier_name.clone(),
                carrier_status: Some(tracking.display_status.clone()),
                carrier_status_raw: Some(tracking.raw.clone()),
                shipped_at: order.shipped_at,
                delivered_at: tracking.delivered_at,
                checked_at: now,
                next_status: Some(transition.next),
            };
            (update, transition.newly_delivered)
        }
        None => {
            let update = TrackingUpdate {
                tracking_number: order.tracking_number.clone(),
                carrier_name: order.carrier_name.clone(),
                carrier_status: None,
                carrier_status_raw: None,
                shipped_at: order.shipped_at,
                delivered_at: None,
                checked_at: now,
                next_status: None,
            };
            (update, false)
        }
    };

    store.record_tracking(order_id, &update).await?;

    if newly_delivered {
        notifier
            .order_delivered(order.external_order_id, &order.buyer_email)
            .await;
    }

    Ok(())
}
