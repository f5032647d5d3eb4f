//! Database operations for the `shipments` table.

use chrono::{DateTime, Utc};
use sellerdesk_core::OrderStatus;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `shipments` table (one-to-one with `orders`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShipmentRow {
    pub id: i64,
    pub order_id: i64,
    pub tracking_number: String,
    pub carrier_name: String,
    /// Display status text from the last carrier lookup; `NULL` until a
    /// lookup has produced a signal.
    pub carrier_status: Option<String>,
    /// Raw carrier payload kept for diagnostics.
    pub carrier_status_raw: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What one sync pass learned about an order's shipment.
///
/// `carrier_status`/`carrier_status_raw`/`delivered_at` are `None` when the
/// carrier lookup failed or produced no signal; the stored values are then
/// retained rather than cleared. `next_status` is `None` when the order
/// status needs no update.
#[derive(Debug, Clone)]
pub struct TrackingUpdate {
    pub tracking_number: String,
    pub carrier_name: String,
    pub carrier_status: Option<String>,
    pub carrier_status_raw: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub checked_at: DateTime<Utc>,
    pub next_status: Option<OrderStatus>,
}

/// Returns the shipment for an order, or `None` if none has been recorded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_shipment(pool: &PgPool, order_id: i64) -> Result<Option<ShipmentRow>, DbError> {
    let row = sqlx::query_as::<_, ShipmentRow>(
        "SELECT id, order_id, tracking_number, carrier_name, carrier_status, \
                carrier_status_raw, shipped_at, delivered_at, last_checked_at, \
                created_at, updated_at \
         FROM shipments \
         WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts the shipment and applies the order-status outcome of one carrier
/// check, in a single transaction.
///
/// The shipment row is created on first sight of a tracking number and
/// updated in place afterwards. Carrier fields only move forward:
/// `COALESCE($n, shipments...)` retains stored values on a no-signal pass,
/// and `delivered_at` is set-if-unset on both the shipment and the order
/// (stale lookups never clear or shift a recorded delivery).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement in the transaction fails.
pub async fn record_tracking(
    pool: &PgPool,
    order_id: i64,
    update: &TrackingUpdate,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO shipments \
             (order_id, tracking_number, carrier_name, carrier_status, carrier_status_raw, \
              shipped_at, delivered_at, last_checked_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (order_id) DO UPDATE SET \
             tracking_number    = EXCLUDED.tracking_number, \
             carrier_name       = EXCLUDED.carrier_name, \
             carrier_status     = COALESCE($4, shipments.carrier_status), \
             carrier_status_raw = COALESCE($5, shipments.carrier_status_raw), \
             shipped_at         = COALESCE($6, shipments.shipped_at), \
             delivered_at       = COALESCE(shipments.delivered_at, $7), \
             last_checked_at    = EXCLUDED.last_checked_at, \
             updated_at         = NOW()",
    )
    .bind(order_id)
    .bind(&update.tracking_number)
    .bind(&update.carrier_name)
    .bind(&update.carrier_status)
    .bind(&update.carrier_status_raw)
    .bind(update.shipped_at)
    .bind(update.delivered_at)
    .bind(update.checked_at)
    .execute(&mut *tx)
    .await?;

    if let Some(next_status) = update.next_status {
        // The closed guard repeats here so a racing manual close between the
        // sync pass's status read and this write still wins.
        sqlx::query(
            "UPDATE orders \
             SET status = $2, \
                 delivered_at = COALESCE(delivered_at, $3), \
                 updated_at = NOW() \
             WHERE id = $1 AND status <> 'closed'",
        )
        .bind(order_id)
        .bind(next_status.to_string())
        .bind(update.delivered_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}
