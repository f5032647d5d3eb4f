use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sellerdesk")]
#[command(about = "Etsy order sync with carrier-tracking reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one order sync for an account
    Sync {
        /// Internal account id
        #[arg(long)]
        account: i64,
    },
    /// Close a delivered order
    Close {
        /// Internal order id
        #[arg(long)]
        order: i64,
    },
    /// Archive a closed order
    Archive {
        /// Internal order id
        #[arg(long)]
        order: i64,
    },
    /// List recent, non-archived orders for an account
    List {
        /// Internal account id
        #[arg(long)]
        account: i64,
        /// Maximum number of orders to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Account management
    #[command(subcommand)]
    Account(commands::AccountCommands),
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = sellerdesk_core::load_app_config()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let pool = sellerdesk_db::connect_pool(
        &config.database_url,
        sellerdesk_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync { account } => commands::run_sync(&pool, &config, account).await,
        Commands::Close { order } => commands::run_close(&pool, order).await,
        Commands::Archive { order } => commands::run_archive(&pool, order).await,
        Commands::List { account, limit } => {
            commands::run_list(&pool, &config, account, limit).await
        }
        Commands::Account(command) => commands::run_account(&pool, command).await,
        Commands::Migrate => commands::run_migrate(&pool).await,
    }
}
