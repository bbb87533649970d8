use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_calendar::cli::{
    handle_build_command, handle_import_command, handle_ledger_command, handle_rebalance_command,
    handle_show_command, handle_spend_command, BuildArgs, ImportArgs, LedgerArgs, RebalanceArgs,
    ShowArgs, SpendArgs, Workspace,
};
use budget_calendar::config::{CalendarPaths, Settings};
use budget_calendar::logging;
use budget_calendar::models::CategoryCatalog;

#[derive(Parser)]
#[command(
    name = "budgetcal",
    author = "Kaylee Beyene",
    version,
    about = "Day-by-day budget calendar",
    long_about = "budgetcal spreads a monthly discretionary budget across the days of \
                  the month and rebalances the plan as real spending comes in, without \
                  ever changing the monthly total."
)]
struct Cli {
    /// Data directory (overrides the platform default)
    #[arg(long, global = true, env = "BUDGET_CALENDAR_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and settings
    Init {
        /// Default user for commands that name none
        #[arg(short, long)]
        user: Option<String>,

        /// Comma-separated category catalog (replaces the default catalog)
        #[arg(short, long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
    },

    /// Show current configuration and paths
    Config,

    /// Build a month's calendar from a plan file
    Build(BuildArgs),

    /// Show a stored calendar
    Show(ShowArgs),

    /// Record one spending entry
    Spend(SpendArgs),

    /// Import spending from a CSV file
    Import(ImportArgs),

    /// Move budget onto overspent days
    #[command(alias = "redistribute")]
    Rebalance(RebalanceArgs),

    /// List recorded transfers
    Ledger(LedgerArgs),
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let paths = match cli.dir {
        Some(dir) => CalendarPaths::with_base_dir(dir),
        None => CalendarPaths::new()?,
    };

    match cli.command {
        Some(Commands::Init { user, categories }) => {
            let mut settings = Settings::load_or_create(&paths)?;
            if let Some(user) = user {
                settings.default_user = user;
            }
            if let Some(names) = categories {
                settings.categories = CategoryCatalog::from_names(&names)?;
            }
            settings.save(&paths)?;

            println!(
                "Initialized budget calendar at: {}",
                paths.base_dir().display()
            );
            println!("Default user: {}", settings.default_user);
            println!(
                "Categories:   {}",
                settings
                    .categories
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Some(Commands::Config) => {
            let settings = Settings::load_or_create(&paths)?;
            println!("Budget Calendar Configuration");
            println!("=============================");
            println!("Base directory:      {}", paths.base_dir().display());
            println!("Calendars directory: {}", paths.calendars_dir().display());
            println!("Audit log:           {}", paths.audit_log().display());
            println!("Initialized:         {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Default user:    {}", settings.default_user);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Audit log:       {}", settings.audit_enabled);
            println!("  Categories:      {}", settings.categories.len());
        }
        Some(Commands::Build(args)) => handle_build_command(&Workspace::open(paths)?, args)?,
        Some(Commands::Show(args)) => handle_show_command(&Workspace::open(paths)?, args)?,
        Some(Commands::Spend(args)) => handle_spend_command(&Workspace::open(paths)?, args)?,
        Some(Commands::Import(args)) => handle_import_command(&Workspace::open(paths)?, args)?,
        Some(Commands::Rebalance(args)) => {
            handle_rebalance_command(&Workspace::open(paths)?, args)?
        }
        Some(Commands::Ledger(args)) => handle_ledger_command(&Workspace::open(paths)?, args)?,
        None => {
            println!("budgetcal - day-by-day budget calendar");
            println!();
            println!("Run 'budgetcal --help' for usage information.");
        }
    }

    Ok(())
}
