//! `budgetcal build`: turn a plan file into a stored calendar

use std::path::PathBuf;

use clap::Args;

use super::{parse_month, Workspace};
use crate::audit::AuditEntry;
use crate::display::format_category_summary;
use crate::error::{CalendarError, CalendarResult};
use crate::models::{calendar_total, MonthlyBudgetPlan};
use crate::services::CalendarBuilder;
use crate::storage::read_document;

#[derive(Args)]
pub struct BuildArgs {
    /// Plan file (JSON, or YAML with a .yaml/.yml extension)
    pub plan: PathBuf,

    /// Month to build (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// User whose calendar to write
    #[arg(short, long)]
    pub user: Option<String>,

    /// Replace an existing calendar for the month
    #[arg(long)]
    pub force: bool,
}

pub fn handle_build_command(workspace: &Workspace, args: BuildArgs) -> CalendarResult<()> {
    let period = parse_month(args.month.as_deref())?;
    let user = workspace.user(args.user);

    let previous = if workspace.store.exists(&user, &period) {
        if !args.force {
            return Err(CalendarError::Validation(format!(
                "A calendar for {} already exists for '{}'. Use --force to rebuild it.",
                period, user
            )));
        }
        Some(workspace.store.load(&user, &period)?)
    } else {
        None
    };

    let plan: MonthlyBudgetPlan = read_document(&args.plan)?;
    let builder = CalendarBuilder::new(workspace.settings.catalog().clone());
    let days = builder.build_for(&plan, &period)?;

    let path = workspace.store.save(&user, &days)?;
    workspace.record(&[AuditEntry::build(
        &user,
        &period,
        previous.as_deref(),
        &days,
    )])?;

    println!(
        "Built {} calendar for '{}': {} across {} days",
        period,
        user,
        calendar_total(&days).format_with_symbol(workspace.symbol()),
        days.len()
    );
    println!("{}", format_category_summary(&days, workspace.symbol()));
    println!("Saved to {}", path.display());
    Ok(())
}
