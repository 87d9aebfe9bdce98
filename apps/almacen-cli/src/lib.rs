//! # almacen-cli: Command-Line Front End
//!
//! Wires configuration, logging and the database together, then hands the
//! parsed command to the matching module under [`commands`].
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (environment, then flags)
//! 3. Connect to database & run migrations
//! 4. Run the command, writing plain text to stdout
//!
//! ## Usage
//! ```bash
//! almacen product add --name "Funda iPhone 15 Pro" --price 80.00 --stock 100
//! almacen sale --customer "Ana" --item <product-id>:2 --item <other-id>
//! almacen service --customer "Luis" --amount 150.00 --description "Cambio de pantalla"
//! almacen dashboard
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use almacen_core::TaxRate;
use almacen_db::{Database, DbConfig};

pub mod commands;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorCode};

use commands::brand::BrandCommand;
use commands::category::CategoryCommand;
use commands::invoice::InvoiceCommand;
use commands::product::ProductCommand;
use commands::sale::{SaleArgs, ServiceArgs};

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "almacen",
    version,
    about = "Inventory and quick sales for a small electronics store"
)]
pub struct Cli {
    /// SQLite database file (overrides ALMACEN_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Tax percentage applied to sales (overrides ALMACEN_TAX_RATE)
    #[arg(long, global = true, value_name = "PERCENT", value_parser = config::parse_tax_percentage)]
    pub tax_rate: Option<TaxRate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the product catalog and stock
    #[command(subcommand)]
    Product(ProductCommand),

    /// Manage product categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Manage product brands
    #[command(subcommand)]
    Brand(BrandCommand),

    /// Sell products in one invoice
    Sale(SaleArgs),

    /// Record a service (repair) invoice
    Service(ServiceArgs),

    /// Browse recorded invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Show store figures
    Dashboard,
}

impl Cli {
    /// Applies flag overrides on top of the loaded configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(rate) = self.tax_rate {
            config.tax_rate = rate;
        }
        config
    }
}

// =============================================================================
// Application Context
// =============================================================================

/// Everything a command needs: the open database and the configuration.
pub struct AppContext {
    pub db: Database,
    pub config: AppConfig,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Parses the process arguments and runs the command.
pub async fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());

    let db = open_database(&config).await?;
    let ctx = AppContext { db, config };

    let mut out = std::io::stdout();
    let result = execute(cli.command, &ctx, &mut out).await;

    ctx.db.close().await;
    result
}

/// Runs one command against an open context.
pub async fn execute(command: Command, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    match command {
        Command::Product(cmd) => commands::product::run(cmd, ctx, out).await,
        Command::Category(cmd) => commands::category::run(cmd, ctx, out).await,
        Command::Brand(cmd) => commands::brand::run(cmd, ctx, out).await,
        Command::Sale(args) => commands::sale::run_sale(args, ctx, out).await,
        Command::Service(args) => commands::sale::run_service(args, ctx, out).await,
        Command::Invoice(cmd) => commands::invoice::run(cmd, ctx, out).await,
        Command::Dashboard => commands::dashboard::run(ctx, out).await,
    }
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - ERROR: Critical failures
/// - WARN: Recoverable issues (rolled-back sales, ignored settings)
/// - INFO: Completed sales, startup
/// - DEBUG: Repository calls
///
/// Set `RUST_LOG=debug` for verbose logging. Logs go to stderr so command
/// output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,almacen=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Opens the database, creating its directory on first use, and checks that
/// it answers queries before any command runs.
async fn open_database(config: &AppConfig) -> AppResult<Database> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::internal(format!(
                    "Failed to create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    info!("Opening database at {}", config.db_path.display());
    let db = Database::new(DbConfig::new(&config.db_path)).await?;

    if !db.health_check().await {
        db.close().await;
        return Err(AppError::new(
            ErrorCode::DatabaseError,
            format!("Database at {} is not responding", config.db_path.display()),
        ));
    }
    Ok(db)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{output, test_context};

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::try_parse_from([
            "almacen",
            "--db",
            "/tmp/otra.db",
            "--tax-rate",
            "10",
            "dashboard",
        ])
        .unwrap();

        let config = cli.apply(AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from("/tmp/otra.db"));
        assert_eq!(config.tax_rate.bps(), 1000);
        assert!(matches!(cli.command, Command::Dashboard));
    }

    #[test]
    fn test_invalid_tax_rate_flag_rejected() {
        assert!(Cli::try_parse_from(["almacen", "--tax-rate", "abc", "dashboard"]).is_err());
    }

    #[test]
    fn test_sale_requires_items() {
        assert!(Cli::try_parse_from(["almacen", "sale", "--customer", "Ana"]).is_err());
    }

    #[tokio::test]
    async fn test_open_database_creates_directory_and_answers() {
        let dir = std::env::temp_dir().join(format!("almacen-open-{}", std::process::id()));
        let config = AppConfig {
            db_path: dir.join("datos").join("pos.db"),
            ..AppConfig::default()
        };

        let db = open_database(&config).await.unwrap();
        assert!(config.db_path.exists());
        assert!(db.health_check().await);

        db.close().await;
        assert!(!db.health_check().await);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_execute_end_to_end() {
        let ctx = test_context().await;

        let add = Cli::try_parse_from([
            "almacen", "product", "add", "--name", "Funda", "--price", "80.00", "--stock", "5",
        ])
        .unwrap();
        let mut buf = Vec::new();
        execute(add.command, &ctx, &mut buf).await.unwrap();
        assert!(output(buf).contains("Funda"));

        let id = ctx.db.products().get_by_name("Funda").await.unwrap().unwrap().id;
        let item = format!("{}:2", id);
        let sale = Cli::try_parse_from(["almacen", "sale", "--customer", "Ana", "--item", &item])
            .unwrap();
        let mut buf = Vec::new();
        execute(sale.command, &ctx, &mut buf).await.unwrap();
        assert!(output(buf).contains("$185.60"));

        let mut buf = Vec::new();
        execute(Command::Dashboard, &ctx, &mut buf).await.unwrap();
        assert!(output(buf).contains("$185.60"));
    }
}
