//! Database operations for the `orders` and `order_items` tables.
//!
//! The order upsert protects `status` and `archived` at the SQL level: a
//! closed order keeps its status no matter what the sync pass writes, and
//! `archived` is only ever touched by [`mark_order_archived`]. Line items are
//! a replace-set that shares one transaction with the order upsert so no
//! reader observes an order stripped of its items mid-sync.

use chrono::{DateTime, Utc};
use sellerdesk_core::{NormalizedOrder, OrderStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `orders` table.
///
/// `status` is stored as text; use [`OrderRow::order_status`] for the typed
/// value.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub public_id: Uuid,
    pub account_id: i64,
    pub external_order_id: i64,
    pub status: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub total_amount: Option<i64>,
    pub currency: String,
    pub order_created_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Parses the stored status text into the typed enum.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidStatusValue`] if the column holds a value
    /// outside the known set (only possible through out-of-band writes).
    pub fn order_status(&self) -> Result<OrderStatus, DbError> {
        self.status
            .parse()
            .map_err(|_| DbError::InvalidStatusValue {
                id: self.id,
                value: self.status.clone(),
            })
    }
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub external_listing_id: Option<i64>,
    pub title: String,
    pub quantity: Option<i32>,
    pub price_amount: Option<i64>,
    pub price_currency: String,
}

/// Returns an order by internal id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_order(pool: &PgPool, order_id: i64) -> Result<Option<OrderRow>, DbError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, public_id, account_id, external_order_id, status, buyer_name, \
                buyer_email, total_amount, currency, order_created_at, shipped_at, delivered_at, \
                archived, last_synced_at, created_at, updated_at \
         FROM orders \
         WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Reads the current status and archived flag for an external order id, if
/// the order exists locally. The sync pass calls this before every upsert to
/// feed the prior status into reconciliation.
///
/// # Errors
///
/// Returns [`DbError::InvalidStatusValue`] on an unparsable stored status, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_order_status(
    pool: &PgPool,
    external_order_id: i64,
) -> Result<Option<(OrderStatus, bool)>, DbError> {
    let row = sqlx::query_as::<_, (i64, String, bool)>(
        "SELECT id, status, archived FROM orders WHERE external_order_id = $1",
    )
    .bind(external_order_id)
    .fetch_optional(pool)
    .await?;

    match row {
        None => Ok(None),
        Some((id, status, archived)) => {
            let status = status
                .parse()
                .map_err(|_| DbError::InvalidStatusValue { id, value: status })?;
            Ok(Some((status, archived)))
        }
    }
}

/// Upserts an order and replaces its line items in a single transaction.
///
/// Conflicts on `external_order_id` overwrite every synced field except:
/// - `status`: the bound value is ignored when the stored status is
///   `closed` (terminal statuses stay pinned even under racing runs), and
/// - `archived` / `delivered_at`: never touched by the upsert path.
///
/// Line items are deleted and re-inserted only when the receipt carried a
/// non-empty item list; an empty remote list is "no new data", not "no
/// items", and leaves existing rows untouched.
///
/// Returns the internal `id` of the upserted order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement in the transaction fails.
pub async fn upsert_order_with_items(
    pool: &PgPool,
    account_id: i64,
    order: &NormalizedOrder,
    status: OrderStatus,
    synced_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let order_id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders \
             (public_id, account_id, external_order_id, status, buyer_name, buyer_email, \
              total_amount, currency, order_created_at, shipped_at, last_synced_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (external_order_id) DO UPDATE SET \
             account_id       = EXCLUDED.account_id, \
             status           = CASE WHEN orders.status = 'closed' \
                                     THEN orders.status ELSE EXCLUDED.status END, \
             buyer_name       = EXCLUDED.buyer_name, \
             buyer_email      = EXCLUDED.buyer_email, \
             total_amount     = EXCLUDED.total_amount, \
             currency         = EXCLUDED.currency, \
             order_created_at = EXCLUDED.order_created_at, \
             shipped_at       = EXCLUDED.shipped_at, \
             last_synced_at   = EXCLUDED.last_synced_at, \
             updated_at       = NOW() \
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(order.external_order_id)
    .bind(status.to_string())
    .bind(&order.buyer_name)
    .bind(&order.buyer_email)
    .bind(order.total_amount)
    .bind(&order.currency)
    .bind(order.order_created_at)
    .bind(order.shipped_at)
    .bind(synced_at)
    .fetch_one(&mut *tx)
    .await?;

    if !order.line_items.is_empty() {
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        for item in &order.line_items {
            sqlx::query(
                "INSERT INTO order_items \
                     (order_id, external_listing_id, title, quantity, price_amount, price_currency) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order_id)
            .bind(item.external_listing_id)
            .bind(&item.title)
            .bind(item.quantity)
            .bind(item.price_amount)
            .bind(&item.price_currency)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(order_id)
}

/// Returns an order's line items, insertion order preserved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_order_items(
    pool: &PgPool,
    order_id: i64,
) -> Result<Vec<OrderItemRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, external_listing_id, title, quantity, price_amount, price_currency \
         FROM order_items \
         WHERE order_id = $1 \
         ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns an account's recent, non-archived orders, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_orders(
    pool: &PgPool,
    account_id: i64,
    created_after: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<OrderRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, public_id, account_id, external_order_id, status, buyer_name, \
                buyer_email, total_amount, currency, order_created_at, shipped_at, delivered_at, \
                archived, last_synced_at, created_at, updated_at \
         FROM orders \
         WHERE account_id = $1 AND archived = FALSE AND order_created_at >= $2 \
         ORDER BY order_created_at DESC, id DESC \
         LIMIT $3",
    )
    .bind(account_id)
    .bind(created_after)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Transitions an order from `delivered` to `closed`.
///
/// The `WHERE status = 'delivered'` guard makes the transition race-safe: a
/// caller that validated the precondition against a stale read affects zero
/// rows instead of corrupting state.
///
/// # Errors
///
/// Returns [`DbError::InvalidOrderTransition`] if the order is not currently
/// delivered, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_order_closed(pool: &PgPool, order_id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE orders \
         SET status = 'closed', updated_at = NOW() \
         WHERE id = $1 AND status = 'delivered'",
    )
    .bind(order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidOrderTransition {
            id: order_id,
            expected_status: "delivered",
        });
    }

    Ok(())
}

/// Sets `archived = TRUE` on a closed, not-yet-archived order.
///
/// # Errors
///
/// Returns [`DbError::InvalidOrderTransition`] if the order is not closed or
/// is already archived, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_order_archived(pool: &PgPool, order_id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE orders \
         SET archived = TRUE, updated_at = NOW() \
         WHERE id = $1 AND status = 'closed' AND archived = FALSE",
    )
    .bind(order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidOrderTransition {
            id: order_id,
            expected_status: "closed",
        });
    }

    Ok(())
}
