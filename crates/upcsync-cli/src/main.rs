mod sync;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use upcsync_core::{AppConfig, BusinessUnit, ConfigError};

use crate::sync::{CatalogSync, DryRunSink, ErrorLog, PgSink, SyncSummary};

/// Exit status for missing configuration and for any store failure.
const EXIT_FATAL: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "upcsync")]
#[command(about = "Load catalog SKU-to-UPC mappings into Postgres")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk every business unit's catalog and upsert SKU/UPC rows (the default)
    Sync {
        /// Restrict the run to these business units (repeatable, e.g. `--unit br/us`)
        #[arg(long = "unit", value_name = "CODE")]
        units: Vec<String>,

        /// Fetch and flatten pages without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the registered business units
    Units,
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check that the database is reachable
    Ping,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Sync {
        units: Vec::new(),
        dry_run: false,
    });

    match dispatch(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            if err.is::<ConfigError>() {
                // Tracing is not initialized without a config.
                eprintln!("cannot start: {message}");
            } else {
                tracing::error!(error = %message, "upcsync failed");
            }
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Configuration and store failures are fatal with status 2; anything else
/// exits 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    let is_fatal = err.chain().any(|cause| {
        cause.is::<ConfigError>()
            || cause.is::<upcsync_db::DbError>()
            || cause.is::<sqlx::Error>()
            || cause.is::<sqlx::migrate::MigrateError>()
    });
    if is_fatal {
        EXIT_FATAL
    } else {
        1
    }
}

fn print_units() {
    for unit in BusinessUnit::all() {
        println!("{:<10} brand={:<3} variant={}", unit.code, unit.brand_code, unit.variant);
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Units => {
            print_units();
            Ok(())
        }
        Commands::Sync { units, dry_run } => {
            let config = configure()?;
            run_sync(&config, &units, dry_run).await
        }
        Commands::Db { command } => {
            let config = configure()?;
            run_db(&config, command).await
        }
    }
}

/// Loads the environment config and starts tracing at its log level.
fn configure() -> Result<AppConfig, ConfigError> {
    let config = upcsync_core::load_app_config()?;
    init_tracing(&config.log_level);
    Ok(config)
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = upcsync_db::PoolConfig::from_app_config(config);
    let pool = upcsync_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let result = match command {
        DbCommands::Migrate => upcsync_db::run_migrations(&pool)
            .await
            .map(|applied| tracing::info!(applied, "migrations complete"))
            .map_err(anyhow::Error::from),
        DbCommands::Ping => upcsync_db::ping(&pool)
            .await
            .map(|()| tracing::info!("database reachable"))
            .map_err(anyhow::Error::from),
    };
    pool.close().await;
    result
}

async fn run_sync(config: &AppConfig, unit_codes: &[String], dry_run: bool) -> anyhow::Result<()> {
    let units = BusinessUnit::select(unit_codes)?;
    let client = upcsync_catalog::CatalogClient::new(&config.client_config())?;
    let error_log = ErrorLog::new(config.error_log_path.clone());

    tracing::info!(
        start = %chrono::Local::now().format("%a %b %e %H:%M:%S %Y"),
        units = units.len(),
        dry_run,
        "catalog sync starting"
    );

    let summary = if dry_run {
        let mut sync = CatalogSync::new(
            &client,
            DryRunSink::default(),
            &error_log,
            &config.catalog_base_url,
            config.page_size,
        );
        let summary = sync.run(&units).await?;
        tracing::info!(
            records = sync.into_sink().records_seen,
            "dry run: nothing written"
        );
        summary
    } else {
        // One store handle for the whole run, closed on every exit path.
        let pool = connect(config).await?;
        let result = CatalogSync::new(
            &client,
            PgSink::new(&pool),
            &error_log,
            &config.catalog_base_url,
            config.page_size,
        )
        .run(&units)
        .await;
        pool.close().await;
        result?
    };

    log_summary(&summary);
    Ok(())
}

fn log_summary(summary: &SyncSummary) {
    tracing::info!(
        end = %chrono::Local::now().format("%a %b %e %H:%M:%S %Y"),
        units = summary.units.len(),
        abandoned = summary.abandoned(),
        rows = summary.rows_affected(),
        "catalog sync finished"
    );
}
