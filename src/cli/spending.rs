//! `budgetcal spend` and `budgetcal import`: record actual spending

use std::path::PathBuf;

use chrono::Local;
use clap::Args;

use super::{parse_date, parse_month, Workspace};
use crate::audit::AuditEntry;
use crate::error::{CalendarError, CalendarResult};
use crate::models::{parse_key, Money, MonthPeriod, SpendingLedger};
use crate::services::{SpendingColumns, SpendingService};

#[derive(Args)]
pub struct SpendArgs {
    /// Category the money was spent in
    pub category: String,

    /// Amount (e.g., "12.50" or "$12.50")
    pub amount: String,

    /// Date of the spending (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,
}

pub fn handle_spend_command(workspace: &Workspace, args: SpendArgs) -> CalendarResult<()> {
    let user = workspace.user(args.user);
    let date = match args.date.as_deref() {
        Some(raw) => parse_date(raw, &workspace.settings.date_format)?,
        None => Local::now().date_naive(),
    };
    let category = parse_key(&args.category)?;
    let amount = Money::parse(&args.amount)
        .map_err(|e| CalendarError::Validation(e.to_string()))?;

    let period = MonthPeriod::containing(date);
    let mut days = workspace.store.load(&user, &period)?;
    let service = SpendingService::new(workspace.settings.catalog().clone());
    service.record(&mut days, date, &category, amount)?;

    workspace.store.save(&user, &days)?;
    let ledger = SpendingLedger::new().with(date, category.clone(), amount);
    workspace.record(&[AuditEntry::spend(&user, &period, &ledger)])?;

    println!(
        "Recorded {} of {} on {}",
        amount.format_with_symbol(workspace.symbol()),
        category,
        date
    );
    Ok(())
}

#[derive(Args)]
pub struct ImportArgs {
    /// CSV file with date, category and amount columns
    pub file: PathBuf,

    /// Month to import into (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    /// Date format of the CSV (defaults to the configured format)
    #[arg(long)]
    pub date_format: Option<String>,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// The file has no header row
    #[arg(long)]
    pub no_header: bool,

    /// Purchases are negative in the file
    #[arg(long)]
    pub invert: bool,
}

pub fn handle_import_command(workspace: &Workspace, args: ImportArgs) -> CalendarResult<()> {
    let user = workspace.user(args.user);
    let period = parse_month(args.month.as_deref())?;
    let mut days = workspace.store.load(&user, &period)?;

    let columns = SpendingColumns::new()
        .with_date_format(
            args.date_format
                .as_deref()
                .unwrap_or(&workspace.settings.date_format),
        )
        .with_delimiter(args.delimiter)
        .with_header(!args.no_header)
        .with_inverted_amounts(args.invert);

    let service = SpendingService::new(workspace.settings.catalog().clone());
    let summary = service.import_csv_file(&args.file, &columns, &period)?;
    service.apply_ledger(&mut days, &summary.ledger)?;

    if !summary.ledger.is_empty() {
        workspace.store.save(&user, &days)?;
        workspace.record(&[AuditEntry::spend(&user, &period, &summary.ledger)])?;
    }

    println!(
        "Imported {} of {} rows ({} total)",
        summary.imported(),
        summary.rows_read,
        summary.ledger.total().format_with_symbol(workspace.symbol())
    );
    for error in &summary.errors {
        println!("  row {}: {}", error.row, error.message);
    }
    Ok(())
}
