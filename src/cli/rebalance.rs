//! `budgetcal rebalance`: cover overspent days from days with room left

use clap::Args;
use tracing::error;

use super::{default_as_of, parse_date, parse_month, Workspace};
use crate::audit::AuditEntry;
use crate::display::{format_classification, format_outcome};
use crate::error::CalendarResult;
use crate::models::SpendingLedger;
use crate::services::BudgetRedistributor;

#[derive(Args)]
pub struct RebalanceArgs {
    /// Month to rebalance (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Last day with final spending (defaults to today, clamped to the month)
    #[arg(short, long)]
    pub as_of: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    /// Show what would move without saving
    #[arg(long)]
    pub dry_run: bool,
}

pub fn handle_rebalance_command(workspace: &Workspace, args: RebalanceArgs) -> CalendarResult<()> {
    let user = workspace.user(args.user);
    let period = parse_month(args.month.as_deref())?;
    let as_of = match args.as_of.as_deref() {
        Some(raw) => parse_date(raw, &workspace.settings.date_format)?,
        None => default_as_of(&period),
    };

    let days = workspace.store.load(&user, &period)?;
    let spending = SpendingLedger::from_calendar(&days);
    let redistributor = BudgetRedistributor::new();
    let symbol = workspace.symbol();

    let outcome = match redistributor.redistribute(&days, &spending, as_of) {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_fatal() {
                error!(user = %user, month = %period, error = %e, "Rebalance aborted");
                workspace.record(&[AuditEntry::abort(&user, &period, &e.to_string())])?;
            }
            return Err(e);
        }
    };

    if args.dry_run {
        let classes = redistributor.classify(&days, &spending, as_of)?;
        println!("{}", format_classification(&classes, symbol));
        println!("{}", format_outcome(&outcome, symbol));
        println!("Dry run: nothing was saved.");
        return Ok(());
    }

    if !outcome.transfers.is_empty() {
        workspace.store.save(&user, &outcome.calendar)?;
        let mut entries = vec![AuditEntry::redistribute(
            &user,
            &period,
            &days,
            &outcome.calendar,
        )];
        entries.extend(
            outcome
                .transfers
                .iter()
                .map(|t| AuditEntry::transfer(&user, t)),
        );
        workspace.record(&entries)?;
    }

    println!("{}", format_outcome(&outcome, symbol));
    Ok(())
}
