use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use checkbook_core::calculations::{
    AllocationPolicy, BreakdownBuilder, ExpenseAllocator, StatementBuilder, TaxCalculator,
    TaxConfig,
};
use checkbook_core::db::factory::{DbConfig, RepositoryRegistry};
use checkbook_core::{EntryRepository, IncomeType, NewEntry};
use checkbook_db_sqlite::SqliteRepositoryFactory;

mod csv_loader;
mod display;
mod export;

/// Turn a batch of income checks into a tax and expense report.
#[derive(Parser, Debug)]
#[command(name = "checkbook")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite database URL for saved entries
    #[arg(
        long,
        global = true,
        default_value = "sqlite:checkbook.db?mode=rwc",
        value_name = "URL"
    )]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the per-check tax breakdown for an income CSV
    Breakdown {
        /// Income CSV with columns sender,gross,type,date
        #[arg(short, long)]
        incomes: PathBuf,
    },

    /// Full pass: breakdown, expense allocation, and final nets
    Reconcile {
        /// Income CSV with columns sender,gross,type,date
        #[arg(short, long)]
        incomes: PathBuf,

        /// Expense CSV with columns sender,expense,amount
        #[arg(short, long)]
        expenses: Option<PathBuf>,

        /// Show a true running balance instead of the cumulative total
        #[arg(long)]
        running_balance: bool,

        /// Save the result as a named entry
        #[arg(long, value_name = "TITLE")]
        save: Option<String>,
    },

    /// Manage saved entries
    Entries {
        #[command(subcommand)]
        command: EntriesCommand,
    },

    /// Monthly and yearly statements over all saved entries
    Statements {
        /// Only include income of this type (e.g. 1099-NEC)
        #[arg(long, value_name = "TYPE")]
        income_type: Option<String>,

        /// Also write the statement sheets to this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Write a saved entry's report sheets as CSV files
    Export {
        /// Entry id (see `entries list`)
        id: i64,

        /// Output directory for taxes.csv, expenses.csv, summary.csv
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum EntriesCommand {
    /// List saved entries, newest first
    List,
    /// Show a saved entry exactly as stored
    Show { id: i64 },
    /// Delete a saved entry and its income and expense rows
    Delete { id: i64 },
}

async fn open_repository(database: &str) -> Result<Box<dyn EntryRepository>> {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let config = DbConfig {
        backend: "sqlite".to_string(),
        connection_string: database.to_string(),
    };

    registry
        .create(&config)
        .await
        .with_context(|| format!("Failed to open entry store '{database}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let Cli { database, command } = Cli::parse();

    let calculator = TaxCalculator::new(TaxConfig::default())?;

    match command {
        Command::Breakdown { incomes } => {
            let records = csv_loader::load_income_records_from_path(&incomes)
                .with_context(|| format!("Failed to load '{}'", incomes.display()))?;
            let breakdown = BreakdownBuilder::new(&calculator).build(&records)?;
            display::print_breakdown(&breakdown);
        }

        Command::Reconcile {
            incomes,
            expenses,
            running_balance,
            save,
        } => {
            let records = csv_loader::load_income_records_from_path(&incomes)
                .with_context(|| format!("Failed to load '{}'", incomes.display()))?;
            let breakdown = BreakdownBuilder::new(&calculator).build(&records)?;

            let expense_lines = match &expenses {
                Some(path) => csv_loader::load_expense_lines_from_path(path)
                    .with_context(|| format!("Failed to load '{}'", path.display()))?,
                None => Vec::new(),
            };

            let policy = if running_balance {
                AllocationPolicy::RunningBalance
            } else {
                AllocationPolicy::CumulativeTotal
            };
            let allocation = ExpenseAllocator::new(policy)
                .allocate(&expense_lines, &breakdown.original_net_by_sender())?;

            display::print_breakdown(&breakdown);
            display::print_allocation(&allocation);
            display::print_summary(
                breakdown.totals.total_tax,
                allocation.total_expense,
                allocation.total_net,
            );

            if let Some(title) = save {
                let entry = NewEntry::from_computation(&title, &breakdown, &allocation)?;
                let repo = open_repository(&database).await?;
                let saved = repo.save_entry(entry).await?;
                info!(id = saved.id, title = %saved.title, "entry saved");
                println!("Saved entry {} \"{}\"", saved.id, saved.title);
            }
        }

        Command::Entries { command } => {
            let repo = open_repository(&database).await?;
            match command {
                EntriesCommand::List => {
                    let entries = repo.list_entries().await?;
                    display::print_entry_listing(&entries);
                }
                EntriesCommand::Show { id } => {
                    let entry = repo.get_entry(id).await?;
                    display::print_entry(&entry);
                }
                EntriesCommand::Delete { id } => {
                    repo.delete_entry(id).await?;
                    println!("Deleted entry {id}");
                }
            }
        }

        Command::Statements { income_type, out } => {
            let repo = open_repository(&database).await?;
            let entries = repo.list_entries().await?;

            let filter = income_type.as_deref().map(IncomeType::parse);
            let statement =
                StatementBuilder::new(&calculator).build(&entries, filter.as_ref())?;

            display::print_statement(&statement);

            if let Some(out_dir) = out {
                let written = export::write_statement_sheets(&statement, &out_dir)?;
                for path in written {
                    println!("Wrote {}", path.display());
                }
            }
        }

        Command::Export { id, out } => {
            let repo = open_repository(&database).await?;
            let entry = repo.get_entry(id).await?;

            let written = export::write_entry_sheets(&entry, &out)?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}
