//! `budgetcal ledger`: list transfers recorded in the audit log

use clap::Args;

use super::{parse_month, Workspace};
use crate::display::format_transfer_ledger;
use crate::error::CalendarResult;

#[derive(Args)]
pub struct LedgerArgs {
    /// Month to list (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    /// Only the most recent N transfers
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Show every audited operation on the calendar, not just transfers
    #[arg(long)]
    pub history: bool,
}

pub fn handle_ledger_command(workspace: &Workspace, args: LedgerArgs) -> CalendarResult<()> {
    let user = workspace.user(args.user);
    let period = parse_month(args.month.as_deref())?;

    if args.history {
        let entries = workspace.audit.history_for(&user, &period)?;
        println!("History for '{}' in {}", user, period);
        if entries.is_empty() {
            println!("No audited operations.");
        }
        for entry in &entries {
            println!("{}", entry.format_human_readable());
        }
        return Ok(());
    }

    let mut transfers = workspace.audit.transfers_for(&user, &period)?;
    if let Some(limit) = args.limit {
        let start = transfers.len().saturating_sub(limit);
        transfers.drain(..start);
    }

    println!("Transfers for '{}' in {}", user, period);
    println!("{}", format_transfer_ledger(&transfers, workspace.symbol()));
    Ok(())
}
