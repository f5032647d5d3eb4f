//! Client and normalization layer for the Etsy v3 seller API.
//!
//! [`EtsyClient`] wraps `reqwest` with the auth headers Etsy v3 expects and
//! exposes the two endpoints the sync engine consumes: a seller's shops and a
//! shop's receipts. [`ReceiptPager`] walks the offset/limit-paginated receipts
//! feed, and [`normalize`] converts one raw receipt into the flat record shape
//! the persistence layer stores.

mod client;
mod error;
mod normalize;
mod pager;
mod shops;
mod types;

pub use client::{EtsyClient, ReceiptsPage};
pub use error::EtsyError;
pub use normalize::map_receipt;
pub use pager::ReceiptPager;
pub use shops::{parse_shop_candidates, ShopCandidate};
pub use types::{Money, RawReceipt, RawReceiptShipment, RawTransaction};
