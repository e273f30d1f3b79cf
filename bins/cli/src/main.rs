//! Kudos command-line interface.
//!
//! Credentials come from the `KUDOS_EMAIL` and `KUDOS_PASSWORD` environment
//! variables (or a `.env` file); the very first `load` against an empty
//! database runs without them.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kudos_core::auth::AccountFilter;
use kudos_core::currency::RateSource;
use kudos_db::connect;
use kudos_engine::{
    AccountRow, EmailNotifier, Engine, HttpRateSource, LoadRow, LogNotifier, MovementRow, Notifier,
};
use kudos_shared::{AppConfig, AppError, EmailService};

#[derive(Parser)]
#[command(name = "kudos", version, about = "Reward points ledger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or update accounts from a CSV file.
    Load {
        /// CSV file with name, department, role, email and optional currency columns.
        file: PathBuf,
    },
    /// Show accounts with balances and converted values.
    Show {
        /// Restrict to one department.
        #[arg(long)]
        department: Option<String>,
        /// Restrict to one email identity.
        #[arg(long)]
        email: Option<String>,
        /// Also write the rows to this file as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Add points to every account in scope.
    Add {
        /// Points per account.
        value: Decimal,
        /// Restrict to one department.
        #[arg(long)]
        department: Option<String>,
        /// Restrict to one email identity.
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove points from every account in scope.
    Remove {
        /// Points per account.
        value: Decimal,
        /// Restrict to one department.
        #[arg(long)]
        department: Option<String>,
        /// Restrict to one email identity.
        #[arg(long)]
        email: Option<String>,
    },
    /// Transfer points from your account to another.
    Transfer {
        /// Points to move.
        value: Decimal,
        /// Recipient email.
        to: String,
    },
    /// Show your own movement history, newest first.
    Movements,
}

/// One row of the load CSV; currency defaults to USD when the column is absent.
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    department: String,
    role: String,
    email: String,
    #[serde(default = "default_currency")]
    currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kudos=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // Caller faults (bad filter, bad credentials, not enough points)
        // exit 2; system faults (database, collaborators) exit 1.
        Err(e) => match e.downcast_ref::<AppError>() {
            Some(app) => {
                eprintln!("error[{}]: {app}", app.error_code());
                if app.is_caller_fault() {
                    ExitCode::from(2)
                } else {
                    ExitCode::from(1)
                }
            }
            None => {
                eprintln!("error: {e:#}");
                ExitCode::from(1)
            }
        },
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let db = connect(&config.database.url, config.database.max_connections).await?;

    let rates: Arc<dyn RateSource> = Arc::new(HttpRateSource::new(&config.exchange)?);
    let notifier: Arc<dyn Notifier> = if config.email.enabled {
        Arc::new(EmailNotifier::new(EmailService::new(config.email.clone())))
    } else {
        Arc::new(LogNotifier)
    };
    let engine = Engine::new(db, rates, notifier);

    let identity = std::env::var("KUDOS_EMAIL").ok();
    let secret = std::env::var("KUDOS_PASSWORD").ok();
    let caller = engine
        .gate()
        .resolve(identity.as_deref(), secret.as_deref())
        .await?;

    match cli.command {
        Command::Load { file } => {
            let rows = read_csv(&file)?;
            let results = engine.load(&caller, rows).await?;
            for result in &results {
                let verb = if result.created { "created" } else { "updated" };
                println!("{verb} {} ({}, {})", result.email, result.name, result.department);
            }
        }
        Command::Show {
            department,
            email,
            output,
        } => {
            let principal = caller.require_principal()?;
            let filter = AccountFilter { department, email };
            let rows = engine.read(principal, filter).await?;
            print_accounts(&rows);
            if let Some(path) = output {
                serde_json::to_writer_pretty(File::create(&path)?, &rows)?;
                println!("wrote {} rows to {}", rows.len(), path.display());
            }
        }
        Command::Add {
            value,
            department,
            email,
        } => {
            let principal = caller.require_principal()?;
            let filter = AccountFilter { department, email };
            let rows = engine.add(principal, value, filter).await?;
            print_accounts(&rows);
        }
        Command::Remove {
            value,
            department,
            email,
        } => {
            let principal = caller.require_principal()?;
            let filter = AccountFilter { department, email };
            let rows = engine.remove(principal, value, filter).await?;
            print_accounts(&rows);
        }
        Command::Transfer { value, to } => {
            let principal = caller.require_principal()?;
            let receipt = engine.transfer(principal, value, &to).await?;
            println!(
                "transferred {} points to {}, {} remaining",
                receipt.value, receipt.to_email, receipt.remaining_balance
            );
        }
        Command::Movements => {
            let principal = caller.require_principal()?;
            let rows = engine.movements(principal).await?;
            print_movements(&rows);
        }
    }

    Ok(())
}

fn read_csv(path: &Path) -> anyhow::Result<Vec<LoadRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CsvRow = record?;
        rows.push(LoadRow {
            name: row.name,
            department: row.department,
            role: row.role,
            email: row.email,
            currency: row.currency,
        });
    }
    Ok(rows)
}

fn print_accounts(rows: &[AccountRow]) {
    println!(
        "{:<28} {:<20} {:<14} {:>12} {:>14}  {:<4} {}",
        "email", "name", "department", "balance", "converted", "curr", "last movement"
    );
    let mut any_degraded = false;
    for row in rows {
        let marker = if row.degraded {
            any_degraded = true;
            "*"
        } else {
            ""
        };
        let last = row
            .last_movement
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:<28} {:<20} {:<14} {:>12} {:>13}{marker}  {:<4} {last}",
            row.email, row.name, row.department, row.balance, row.converted, row.currency
        );
    }
    if any_degraded {
        println!("* rate lookup failed, converted value unavailable");
    }
}

fn print_movements(rows: &[MovementRow]) {
    println!(
        "{:<18} {:>12} {:>14}  {}",
        "date", "value", "converted", "actor"
    );
    for row in rows {
        println!(
            "{:<18} {:>12} {:>14}  {}",
            row.date.format("%Y-%m-%d %H:%M"),
            row.value,
            row.converted,
            row.actor
        );
    }
}
