use sellerdesk_core::StatusError;
use sellerdesk_db::DbError;
use sellerdesk_etsy::EtsyError;
use thiserror::Error;

/// Errors that abort an entire sync run.
///
/// Carrier-side failures never appear here: a failed tracking lookup is
/// absorbed per receipt and the run continues. Receipts persisted before the
/// failing step stay committed; the caller sees one aggregate reason and no
/// partial count.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("account {0} not found")]
    AccountNotFound(i64),

    /// The account has never completed the Etsy link, so there is no user id
    /// to resolve a shop from. Unrecoverable until the account is re-linked.
    #[error("the account has no Etsy user id; re-connect the Etsy account")]
    MissingEtsyUserId,

    #[error("no shop found for this Etsy account")]
    NoShopFound,

    /// Shop resolution or a receipts page fetch failed.
    #[error(transparent)]
    Etsy(#[from] EtsyError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Rejections from the manual close/archive operations.
///
/// Precondition violations surface the current order state in the message so
/// the caller can report an actionable reason; nothing is mutated on
/// rejection.
#[derive(Debug, Error)]
pub enum OrderActionError {
    #[error("order {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Precondition(#[from] StatusError),

    #[error(transparent)]
    Db(#[from] DbError),
}
