//! Offline unit tests for sellerdesk-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use sellerdesk_core::{AppConfig, Environment, OrderStatus};
use sellerdesk_db::{AccountRow, OrderRow, PoolConfig, ShipmentRow, TrackingUpdate};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        etsy_client_id: None,
        etsy_shared_secret: None,
        shipentegra_base_url: "https://api.shipentegra.com/v1".to_string(),
        shipentegra_client_id: None,
        shipentegra_client_secret: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        http_timeout_secs: 20,
        sync_page_size: 50,
        sync_window_days: 30,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`AccountRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn account_row_has_expected_fields() {
    let row = AccountRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        etsy_user_id: Some(88_i64),
        access_token: "88.token".to_string(),
        shop_id: None,
        shop_name: String::new(),
        last_synced_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.etsy_user_id, Some(88));
    assert!(row.shop_id.is_none(), "shop starts unresolved");
    assert!(row.last_synced_at.is_none());
}

#[test]
fn order_row_status_parses_stored_text() {
    let mut row = OrderRow {
        id: 5_i64,
        public_id: Uuid::new_v4(),
        account_id: 1_i64,
        external_order_id: 9001_i64,
        status: "in_transit".to_string(),
        buyer_name: "A Buyer".to_string(),
        buyer_email: String::new(),
        total_amount: Some(2599_i64),
        currency: "USD".to_string(),
        order_created_at: Some(Utc::now()),
        shipped_at: None,
        delivered_at: None,
        archived: false,
        last_synced_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.order_status().unwrap(), OrderStatus::InTransit);

    row.status = "misdelivered".to_string();
    assert!(row.order_status().is_err());
}

/// Compile-time smoke test for [`ShipmentRow`] and [`TrackingUpdate`].
#[test]
fn tracking_update_models_a_no_signal_pass() {
    let row = ShipmentRow {
        id: 1_i64,
        order_id: 5_i64,
        tracking_number: "TRK-1".to_string(),
        carrier_name: "usps".to_string(),
        carrier_status: None,
        carrier_status_raw: None,
        shipped_at: None,
        delivered_at: None,
        last_checked_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    assert!(row.carrier_status.is_none());

    let update = TrackingUpdate {
        tracking_number: "TRK-1".to_string(),
        carrier_name: "usps".to_string(),
        carrier_status: None,
        carrier_status_raw: None,
        shipped_at: None,
        delivered_at: None,
        checked_at: Utc::now(),
        next_status: None,
    };
    assert!(
        update.carrier_status.is_none() && update.next_status.is_none(),
        "a failed lookup retains stored carrier fields and leaves status alone"
    );
}
