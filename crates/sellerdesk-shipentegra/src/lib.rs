//! Client and status normalizer for the ShipEntegra carrier-tracking API.
//!
//! [`ShipentegraClient`] exchanges client credentials for a short-lived
//! bearer token (cached in-process by [`TokenProvider`]) and looks up
//! shipment activities by tracking number. [`normalize_tracking`] folds the
//! free-text status fields of an activities payload into the carrier signal
//! the order state machine consumes.

mod client;
mod error;
mod normalize;
mod token;
mod types;

pub use client::ShipentegraClient;
pub use error::ShipentegraError;
pub use normalize::{normalize_tracking, NormalizedTracking};
pub use token::TokenProvider;
pub use types::{ActivitiesData, ActivitiesPayload, Activity};
