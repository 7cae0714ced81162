//! # Candy Kush Companion CLI
//!
//! Shell front end for the receipt encoder and the response cache.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        candykush (this crate)                           │
//! │                                                                         │
//! │  main.rs ────► parse args, init tracing, print result / exit code      │
//! │                                                                         │
//! │  lib.rs ─────► Cli definition, path resolution, dispatch               │
//! │                                                                         │
//! │  commands/ ──► render (cart → printer bytes)                           │
//! │                cache  (stats, keys, show, items, evict, clear)         │
//! │                                                                         │
//! │        │                        │                        │              │
//! │        ▼                        ▼                        ▼              │
//! │  candykush-core           candykush-print          candykush-db         │
//! │  (cart, periods)          (encoders, config)       (SQLite cache)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr)
//! 2. Load `printer.toml` for render commands
//! 3. Resolve the cache path and open the database for cache commands
//! 4. Run the command and return its output

pub mod commands;
pub mod error;

use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use candykush_core::Period;
use candykush_db::{Database, DbConfig};
use candykush_print::PrinterConfig;

use commands::render::{self, OutputFormat};
use error::{AppError, AppResult};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,candykush=debug,sqlx=warn";

/// Environment variable overriding the cache database path.
pub const DB_PATH_ENV: &str = "CANDYKUSH_DB_PATH";

// =============================================================================
// Arguments
// =============================================================================

/// Receipt rendering and response cache tools for the Candy Kush POS.
#[derive(Parser, Debug)]
#[command(name = "candykush")]
#[command(version)]
pub struct Cli {
    /// Path to printer.toml (default: platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the cache database (default: $CANDYKUSH_DB_PATH or platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log at debug level for every crate
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a cart JSON file into printer bytes
    Render {
        /// Cart JSON, bare or wrapped in the cart endpoint envelope
        cart: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Write a 32-column text receipt whatever the configured printer
        #[arg(long)]
        text: bool,

        /// Timestamp printed on the receipt (default: now, dd/mm/yyyy HH:MM)
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Render a test page for the configured printer
    TestPrint {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Write a text page whatever the configured printer
        #[arg(long)]
        text: bool,
    },

    /// Inspect or prune the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Row counts and sync progress
    Stats,

    /// Delete old rows, or every row of one date key
    Evict {
        /// Delete sales rows stored more than this many days ago
        #[arg(long, conflicts_with = "date_key")]
        days: Option<i64>,

        /// Delete every sales row with this date key
        #[arg(long)]
        date_key: Option<String>,
    },

    /// Delete everything in both tables
    Clear {
        /// Confirm the irreversible delete
        #[arg(long)]
        yes: bool,
    },

    /// List cached date keys, newest first
    Keys { kind: String, period: Period },

    /// Print one cached report with its age
    Show {
        kind: String,
        period: Period,
        date_key: String,
    },

    /// Print a cached item list
    Items { key: String },
}

// =============================================================================
// Startup
// =============================================================================

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=candykush_db=trace` - Trace the cache only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Logs go to stderr so command output can be piped.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug,sqlx=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the cache database path.
///
/// ## Resolution Order
/// 1. `--db` argument
/// 2. `CANDYKUSH_DB_PATH` environment variable
/// 3. Platform data directory:
///    - **Linux**: `~/.local/share/candykush/cache.db`
///    - **macOS**: `~/Library/Application Support/shop.candykush.candykush/cache.db`
///    - **Windows**: `%APPDATA%\candykush\candykush\data\cache.db`
pub fn database_path(cli_override: Option<PathBuf>) -> AppResult<PathBuf> {
    if let Some(path) = cli_override {
        return Ok(path);
    }

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let proj_dirs = ProjectDirs::from("shop", "candykush", "candykush").ok_or_else(|| {
        AppError::new(
            error::ErrorCode::Internal,
            "Could not determine app data directory",
        )
    })?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("cache.db"))
}

async fn open_database(cli_override: Option<PathBuf>) -> AppResult<Database> {
    let path = database_path(cli_override)?;
    debug!(?path, "Database path determined");
    Ok(Database::new(DbConfig::new(path)).await?)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one command and returns what it prints.
pub async fn run(cli: Cli) -> AppResult<String> {
    match cli.command {
        Command::Render {
            cart,
            output,
            text,
            timestamp,
        } => {
            let config = PrinterConfig::load(cli.config)?;
            let format = OutputFormat::select(config.printer.kind, text);
            let cart = render::load_cart(&cart)?;
            let timestamp = timestamp.unwrap_or_else(render::now_timestamp);

            let bytes = render::render_cart(&cart, &config, format, &timestamp)?;
            render::write_output(&output, &bytes)?;
            Ok(format!(
                "Wrote {} bytes ({:?}) to {}",
                bytes.len(),
                format,
                output.display()
            ))
        }
        Command::TestPrint { output, text } => {
            // A broken printer.toml should not stop the test page
            let config = PrinterConfig::load_or_default(cli.config);
            let format = OutputFormat::select(config.printer.kind, text);

            let bytes = render::render_test_page(&config, format, &render::now_timestamp())?;
            render::write_output(&output, &bytes)?;
            Ok(format!("Wrote test page to {}", output.display()))
        }
        Command::Cache { action } => {
            let db = open_database(cli.db).await?;
            let result = run_cache(&db, action).await;
            db.close().await;
            result
        }
    }
}

async fn run_cache(db: &Database, action: CacheAction) -> AppResult<String> {
    let today = chrono::Local::now().date_naive();
    info!(?action, "Running cache command");

    match action {
        CacheAction::Stats => commands::cache::stats(db, today).await,
        CacheAction::Evict { days, date_key } => {
            commands::cache::evict(db, days, date_key.as_deref()).await
        }
        CacheAction::Clear { yes } => commands::cache::clear(db, yes).await,
        CacheAction::Keys { kind, period } => commands::cache::keys(db, &kind, period).await,
        CacheAction::Show {
            kind,
            period,
            date_key,
        } => commands::cache::show(db, &kind, period, &date_key, today).await,
        CacheAction::Items { key } => commands::cache::items(db, &key).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "candykush", "render", "cart.json", "-o", "out.bin", "--text",
        ])
        .unwrap();

        match cli.command {
            Command::Render {
                cart, output, text, ..
            } => {
                assert_eq!(cart, PathBuf::from("cart.json"));
                assert_eq!(output, PathBuf::from("out.bin"));
                assert!(text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_cache_keys_period() {
        let cli =
            Cli::try_parse_from(["candykush", "cache", "keys", "sales-summary", "month"]).unwrap();

        match cli.command {
            Command::Cache {
                action: CacheAction::Keys { kind, period },
            } => {
                assert_eq!(kind, "sales-summary");
                assert_eq!(period, Period::ThisMonth);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_period() {
        assert!(Cli::try_parse_from(["candykush", "cache", "keys", "sales-summary", "decade"])
            .is_err());
    }

    #[test]
    fn test_evict_days_conflicts_with_date_key() {
        assert!(Cli::try_parse_from([
            "candykush", "cache", "evict", "--days", "3", "--date-key", "2024-06",
        ])
        .is_err());
    }

    #[test]
    fn test_database_path_prefers_argument() {
        let path = database_path(Some(PathBuf::from("/tmp/explicit.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit.db"));
    }

    #[tokio::test]
    async fn test_test_print_survives_broken_config() {
        let dir = std::env::temp_dir().join(format!("candykush-test-print-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = dir.join("printer.toml");
        std::fs::write(&config, "[printer\nkind = ").unwrap();
        let output = dir.join("test-page.txt");

        let cli = Cli {
            config: Some(config),
            db: None,
            verbose: false,
            command: Command::TestPrint {
                output: output.clone(),
                text: true,
            },
        };
        let message = run(cli).await.unwrap();
        assert!(message.starts_with("Wrote test page"));
        assert!(!std::fs::read(&output).unwrap().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_run_render_and_cache_end_to_end() {
        let dir = std::env::temp_dir().join(format!("candykush-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cart = dir.join("cart.json");
        std::fs::write(
            &cart,
            r#"{"items": [{"id": "1", "productId": "p1", "name": "Gummy Bears",
                "quantity": 1, "price": 45, "total": 45}],
                "total": 45, "lastUpdated": "2024-06-15T10:30:00Z"}"#,
        )
        .unwrap();
        let output = dir.join("receipt.txt");

        let cli = Cli {
            config: Some(dir.join("missing-printer.toml")),
            db: Some(dir.join("cache.db")),
            verbose: false,
            command: Command::Render {
                cart: cart.clone(),
                output: output.clone(),
                text: true,
                timestamp: Some("15/06/2024 10:30".into()),
            },
        };
        let message = run(cli).await.unwrap();
        assert!(message.starts_with("Wrote "));
        assert!(std::fs::read(&output).unwrap().ends_with(&[0x1B, 0x69]));

        let cli = Cli {
            config: None,
            db: Some(dir.join("cache.db")),
            verbose: false,
            command: Command::Cache {
                action: CacheAction::Stats,
            },
        };
        let stats = run(cli).await.unwrap();
        assert!(stats.contains("Sales entries:  0"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
