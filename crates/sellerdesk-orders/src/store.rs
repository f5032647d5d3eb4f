//! The persistence seam used by the sync pass.
//!
//! [`OrderStore`] narrows the database layer to exactly what a sync run
//! touches, so the orchestrator can be exercised end-to-end against an
//! in-memory store in tests. [`PgStore`] delegates to `sellerdesk-db`.

use chrono::{DateTime, Utc};
use sellerdesk_core::{NormalizedOrder, OrderStatus};
use sellerdesk_db::{AccountRow, DbError, TrackingUpdate};
use sqlx::PgPool;

/// Storage operations required by one sync run.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    async fn load_account(&self, account_id: i64) -> Result<Option<AccountRow>, DbError>;

    async fn save_shop_identity(
        &self,
        account_id: i64,
        shop_id: i64,
        shop_name: &str,
    ) -> Result<(), DbError>;

    /// Current `(status, archived)` for an external order id, read before the
    /// upsert so reconciliation sees the prior state.
    async fn order_status(
        &self,
        external_order_id: i64,
    ) -> Result<Option<(OrderStatus, bool)>, DbError>;

    /// Upserts the order and replaces its items as one unit; returns the
    /// internal order id.
    async fn upsert_order(
        &self,
        account_id: i64,
        order: &NormalizedOrder,
        status: OrderStatus,
        synced_at: DateTime<Utc>,
    ) -> Result<i64, DbError>;

    /// Persists the shipment state and the order-status outcome of one
    /// carrier check together.
    async fn record_tracking(&self, order_id: i64, update: &TrackingUpdate)
        -> Result<(), DbError>;

    async fn touch_account_synced(&self, account_id: i64) -> Result<(), DbError>;
}

/// Postgres-backed [`OrderStore`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for PgStore {
    async fn load_account(&self, account_id: i64) -> Result<Option<AccountRow>, DbError> {
        sellerdesk_db::get_account(&self.pool, account_id).await
    }

    async fn save_shop_identity(
        &self,
        account_id: i64,
        shop_id: i64,
        shop_name: &str,
    ) -> Result<(), DbError> {
        sellerdesk_db::set_account_shop(&self.pool, account_id, shop_id, shop_name).await
    }

    async fn order_status(
        &self,
        external_order_id: i64,
    ) -> Result<Option<(OrderStatus, bool)>, DbError> {
        sellerdesk_db::get_order_status(&self.pool, external_order_id).await
    }

    async fn upsert_order(
        &self,
        account_id: i64,
        order: &NormalizedOrder,
        status: OrderStatus,
        synced_at: DateTime<Utc>,
    ) -> Result<i64, DbError> {
        sellerdesk_db::upsert_order_with_items(&self.pool, account_id, order, status, synced_at)
            .await
    }

    async fn record_tracking(
        &self,
        order_id: i64,
        update: &TrackingUpdate,
    ) -> Result<(), DbError> {
        sellerdesk_db::record_tracking(&self.pool, order_id, update).await
    }

    async fn touch_account_synced(&self, account_id: i64) -> Result<(), DbError> {
        sellerdesk_db::touch_account_synced(&self.pool, account_id).await
    }
}
