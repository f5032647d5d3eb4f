//! Database operations for the `accounts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `accounts` table.
///
/// `shop_id`/`shop_name` are populated once by shop resolution during the
/// first sync run and treated as immutable afterwards (explicit re-resolution
/// aside).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub public_id: Uuid,
    pub etsy_user_id: Option<i64>,
    pub access_token: String,
    pub shop_id: Option<i64>,
    pub shop_name: String,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns an account by internal id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_account(pool: &PgPool, account_id: i64) -> Result<Option<AccountRow>, DbError> {
    let row = sqlx::query_as::<_, AccountRow>(
        "SELECT id, public_id, etsy_user_id, access_token, shop_id, shop_name, \
                last_synced_at, created_at, updated_at \
         FROM accounts \
         WHERE id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Creates a new account row and returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_account(
    pool: &PgPool,
    etsy_user_id: Option<i64>,
    access_token: &str,
) -> Result<AccountRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, AccountRow>(
        "INSERT INTO accounts (public_id, etsy_user_id, access_token) \
         VALUES ($1, $2, $3) \
         RETURNING id, public_id, etsy_user_id, access_token, shop_id, shop_name, \
                   last_synced_at, created_at, updated_at",
    )
    .bind(public_id)
    .bind(etsy_user_id)
    .bind(access_token)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Persists the resolved shop identity on an account.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the account does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_account_shop(
    pool: &PgPool,
    account_id: i64,
    shop_id: i64,
    shop_name: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE accounts \
         SET shop_id = $1, shop_name = $2, updated_at = NOW() \
         WHERE id = $3",
    )
    .bind(shop_id)
    .bind(shop_name)
    .bind(account_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Stamps `last_synced_at = NOW()` on an account after a successful run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn touch_account_synced(pool: &PgPool, account_id: i64) -> Result<(), DbError> {
    sqlx::query("UPDATE accounts SET last_synced_at = NOW(), updated_at = NOW() WHERE id = $1")
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(())
}
