//! Command handlers for the CLI.
//!
//! These are called from `main` after the database pool and config are
//! established. `sync` is the ad-hoc trigger for a sync run (scheduling
//! belongs to cron/systemd, not this binary); the remaining subcommands are
//! lifecycle actions and read-only queries.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use sellerdesk_core::AppConfig;
use sellerdesk_etsy::EtsyClient;
use sellerdesk_orders::{
    archive_order, close_order, sync_orders, ArchiveOutcome, NoopNotifier, PgStore, SyncOptions,
};
use sellerdesk_shipentegra::ShipentegraClient;
use sqlx::PgPool;

/// Sub-commands available under `account`.
#[derive(Debug, Subcommand)]
pub enum AccountCommands {
    /// Create a local account record for a linked Etsy user
    Add {
        /// Etsy numeric user id (the prefix of the OAuth access token)
        #[arg(long)]
        etsy_user_id: i64,
        /// OAuth access token for the Etsy account
        #[arg(long)]
        access_token: String,
    },
}

/// Run one sync for the account and report the processed count.
pub async fn run_sync(pool: &PgPool, config: &AppConfig, account_id: i64) -> anyhow::Result<()> {
    let account = sellerdesk_db::get_account(pool, account_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("account {account_id} not found"))?;

    let (Some(client_id), Some(shared_secret)) =
        (&config.etsy_client_id, &config.etsy_shared_secret)
    else {
        anyhow::bail!("ETSY_CLIENT_ID / ETSY_SHARED_SECRET are not set; cannot run order sync");
    };
    let api_key = format!("{client_id}:{shared_secret}");

    let etsy = EtsyClient::new(&account.access_token, &api_key, config.http_timeout_secs)
        .map_err(|e| anyhow::anyhow!("failed to build Etsy client: {e}"))?;
    let carrier = ShipentegraClient::with_base_url(
        config.shipentegra_client_id.as_deref().unwrap_or_default(),
        config.shipentegra_client_secret.as_deref().unwrap_or_default(),
        config.http_timeout_secs,
        &config.shipentegra_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build ShipEntegra client: {e}"))?;

    let store = PgStore::new(pool.clone());
    let processed = sync_orders(
        &store,
        &etsy,
        &carrier,
        &NoopNotifier,
        account_id,
        SyncOptions::from_app_config(config),
    )
    .await?;

    println!("synced {processed} orders");
    Ok(())
}

pub async fn run_close(pool: &PgPool, order_id: i64) -> anyhow::Result<()> {
    close_order(pool, order_id).await?;
    println!("order {order_id} closed");
    Ok(())
}

pub async fn run_archive(pool: &PgPool, order_id: i64) -> anyhow::Result<()> {
    match archive_order(pool, order_id).await? {
        ArchiveOutcome::Archived => println!("order {order_id} archived"),
        ArchiveOutcome::AlreadyArchived => println!("order {order_id} is already archived"),
    }
    Ok(())
}

pub async fn run_list(
    pool: &PgPool,
    config: &AppConfig,
    account_id: i64,
    limit: i64,
) -> anyhow::Result<()> {
    let cutoff = Utc::now() - chrono::Duration::days(config.sync_window_days);
    let orders = sellerdesk_db::list_recent_orders(pool, account_id, cutoff, limit).await?;

    if orders.is_empty() {
        println!("no recent orders for account {account_id}");
        return Ok(());
    }

    println!(
        "{:>10}  {:>14}  {:<12}  {:<24}  {:>10}  {}",
        "id", "external id", "status", "buyer", "total", "created"
    );
    for order in &orders {
        println!(
            "{:>10}  {:>14}  {:<12}  {:<24}  {:>10}  {}",
            order.id,
            order.external_order_id,
            order.status,
            truncate(&order.buyer_name, 24),
            fmt_amount(order.total_amount, &order.currency),
            fmt_date(order.order_created_at),
        );
    }
    Ok(())
}

pub async fn run_account(pool: &PgPool, command: AccountCommands) -> anyhow::Result<()> {
    match command {
        AccountCommands::Add {
            etsy_user_id,
            access_token,
        } => {
            let account =
                sellerdesk_db::create_account(pool, Some(etsy_user_id), &access_token).await?;
            println!("created account {} ({})", account.id, account.public_id);
            Ok(())
        }
    }
}

pub async fn run_migrate(pool: &PgPool) -> anyhow::Result<()> {
    let applied = sellerdesk_db::run_migrations(pool).await?;
    println!("applied {applied} migrations");
    Ok(())
}

/// Format an optional timestamp for display, returning `"—"` when `None`.
fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(
        || "\u{2014}".to_string(),
        |d| d.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Format a minor-unit amount with its currency, `"—"` when absent.
fn fmt_amount(amount: Option<i64>, currency: &str) -> String {
    match amount {
        None => "\u{2014}".to_string(),
        Some(minor) => {
            #[allow(clippy::cast_precision_loss)]
            let major = minor as f64 / 100.0;
            if currency.is_empty() {
                format!("{major:.2}")
            } else {
                format!("{major:.2} {currency}")
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}\u{2026}")
    }
}
