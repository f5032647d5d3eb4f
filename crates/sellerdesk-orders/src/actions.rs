//! Manual order lifecycle actions: close and archive.
//!
//! Both validate their precondition against a fresh read and reject with the
//! current state in the error; the underlying UPDATE re-checks the
//! precondition in its WHERE clause, so a race with another writer can only
//! turn into a rejection, never a bad transition.

use sellerdesk_core::{check_archive, check_close, ArchiveCheck, StatusError};
use sellerdesk_db::DbError;
use sqlx::PgPool;

use crate::error::OrderActionError;

/// Outcome of [`archive_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    /// The order was already archived; nothing changed.
    AlreadyArchived,
}

/// Closes a delivered order.
///
/// # Errors
///
/// - [`OrderActionError::NotFound`] if the order does not exist.
/// - [`OrderActionError::Precondition`] if the order is not delivered.
/// - [`OrderActionError::Db`] on storage failure.
pub async fn close_order(pool: &PgPool, order_id: i64) -> Result<(), OrderActionError> {
    let order = sellerdesk_db::get_order(pool, order_id)
        .await?
        .ok_or(OrderActionError::NotFound(order_id))?;
    check_close(order.order_status()?)?;

    match sellerdesk_db::mark_order_closed(pool, order_id).await {
        Ok(()) => Ok(()),
        // Lost a race: someone moved the order between our read and the
        // guarded update. Re-read so the rejection names the actual state.
        Err(DbError::InvalidOrderTransition { .. }) => {
            let current = current_status(pool, order_id).await?;
            Err(StatusError::NotDelivered { current }.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Archives a closed order. Archiving an already-archived order is a no-op,
/// not an error.
///
/// # Errors
///
/// - [`OrderActionError::NotFound`] if the order does not exist.
/// - [`OrderActionError::Precondition`] if the order is not closed.
/// - [`OrderActionError::Db`] on storage failure.
pub async fn archive_order(pool: &PgPool, order_id: i64) -> Result<ArchiveOutcome, OrderActionError> {
    let order = sellerdesk_db::get_order(pool, order_id)
        .await?
        .ok_or(OrderActionError::NotFound(order_id))?;

    match check_archive(order.order_status()?, order.archived)? {
        ArchiveCheck::AlreadyArchived => Ok(ArchiveOutcome::AlreadyArchived),
        ArchiveCheck::Archive => match sellerdesk_db::mark_order_archived(pool, order_id).await {
            Ok(()) => Ok(ArchiveOutcome::Archived),
            Err(DbError::InvalidOrderTransition { .. }) => {
                let fresh = sellerdesk_db::get_order(pool, order_id)
                    .await?
                    .ok_or(OrderActionError::NotFound(order_id))?;
                if fresh.archived {
                    Ok(ArchiveOutcome::AlreadyArchived)
                } else {
                    Err(StatusError::NotClosed {
                        current: fresh.order_status()?,
                    }
                    .into())
                }
            }
            Err(e) => Err(e.into()),
        },
    }
}

async fn current_status(
    pool: &PgPool,
    order_id: i64,
) -> Result<sellerdesk_core::OrderStatus, OrderActionError> {
    let order = sellerdesk_db::get_order(pool, order_id)
        .await?
        .ok_or(OrderActionError::NotFound(order_id))?;
    Ok(order.order_status()?)
}
