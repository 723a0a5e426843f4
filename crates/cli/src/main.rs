//! `nimbus` CLI entry-point.
//!
//! Available sub-commands:
//! - `products`  — transactional product menu (default).
//! - `employees` — print the employee report.
//! - `students`  — student management menu.
//! - `migrate`   — create the exercise tables if they are missing.
//!
//! Diagnostics go to stderr through `tracing` (`RUST_LOG`, default `warn`);
//! stdout belongs to the menus.

use std::io;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use db::{DbConfig, DbError, Gateway};
use session::{Console, ProductSession, SessionExit, StudentMenu};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit code used when the final commit and its compensating rollback both
/// failed, so the server may still hold an open transaction.
const EXIT_UNRESOLVED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "nimbus",
    about = "Menu-driven CRUD exercises over a relational database",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Full connection URL (mysql://… or sqlite://…); overrides the
    /// individual settings below.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "NIMBUS_DB_HOST", default_value = "localhost")]
    host: String,

    #[arg(long, env = "NIMBUS_DB_PORT", default_value_t = 3306)]
    port: u16,

    #[arg(long, env = "NIMBUS_DB_NAME", default_value = "nimbusdb")]
    database: String,

    #[arg(long, env = "NIMBUS_DB_USER", default_value = "root")]
    user: String,

    #[arg(long, env = "NIMBUS_DB_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,
}

impl ConnectionArgs {
    fn resolve(&self) -> Result<DbConfig, DbError> {
        match &self.database_url {
            Some(url) => DbConfig::from_url(url.as_str()),
            None => DbConfig::from_parts(
                &self.host,
                self.port,
                &self.database,
                &self.user,
                &self.password,
            ),
        }
    }
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Product CRUD with manual commit/rollback.
    Products,
    /// Print every employee and exit.
    Employees,
    /// Student management (every change is saved immediately).
    Students,
    /// Create the Product, Employee and Student tables if missing.
    Migrate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            println!("Error: {e:#}");
            ExitCode::SUCCESS
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match cli.connection.resolve() {
        Ok(config) => config,
        Err(e) => {
            println!("Database error: {e}");
            return Ok(ExitCode::SUCCESS);
        }
    };

    match cli.command.unwrap_or(Command::Products) {
        Command::Products => products(&config).await,
        Command::Employees => {
            session::employees::run(&config, &mut io::stdout()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Students => students(&config).await,
        Command::Migrate => migrate(&config).await,
    }
}

async fn products(config: &DbConfig) -> anyhow::Result<ExitCode> {
    let gateway = match Gateway::connect(config).await {
        Ok(gateway) => gateway,
        Err(e) => {
            error!("could not open the product session: {e}");
            println!("Database error: {e}");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let console = Console::new(io::stdin().lock(), io::stdout());
    let mut product_session = ProductSession::new(gateway, console);
    let outcome = product_session.run().await;
    product_session.close().await;

    match outcome? {
        SessionExit::Unresolved => Ok(ExitCode::from(EXIT_UNRESOLVED)),
        _ => Ok(ExitCode::SUCCESS),
    }
}

async fn students(config: &DbConfig) -> anyhow::Result<ExitCode> {
    let pool = match db::pool::connect(config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("could not open the student menu: {e}");
            println!("Database error: {e}");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let console = Console::new(io::stdin().lock(), io::stdout());
    let mut menu = StudentMenu::new(pool, console);
    let outcome = menu.run().await;
    let (pool, _) = menu.into_parts();
    pool.close().await;

    outcome?;
    Ok(ExitCode::SUCCESS)
}

async fn migrate(config: &DbConfig) -> anyhow::Result<ExitCode> {
    info!("Running migrations against {}", config.redacted());
    let result = match db::pool::connect(config).await {
        Ok(pool) => {
            let result = db::pool::run_migrations(&pool).await;
            pool.close().await;
            result
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            println!("✅ Tables are in place.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("migration failed: {e}");
            println!("❌ Migration failed: {e}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
