//! Order synchronization and lifecycle operations.
//!
//! This crate is the public operation surface of sellerdesk:
//! [`sync_orders`] drives one end-to-end sync run against the Etsy receipts
//! feed and the ShipEntegra tracking API, [`close_order`] and
//! [`archive_order`] are the manual lifecycle actions. Persistence goes
//! through the [`OrderStore`] seam; [`PgStore`] is the Postgres
//! implementation used by the CLI.

mod actions;
mod error;
mod notify;
mod store;
mod sync;

pub use actions::{archive_order, close_order, ArchiveOutcome};
pub use error::{OrderActionError, SyncError};
pub use notify::{DeliveryNotifier, NoopNotifier};
pub use store::{OrderStore, PgStore};
pub use sync::{sync_orders, SyncOptions};
