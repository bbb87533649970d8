//! `budgetcal show`: print a stored calendar

use clap::Args;

use super::{parse_month, Workspace};
use crate::display::{format_calendar, format_category_summary};
use crate::error::CalendarResult;

#[derive(Args)]
pub struct ShowArgs {
    /// Month to show (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    /// Show month totals per category instead of days
    #[arg(short, long)]
    pub categories: bool,

    /// List the months with a stored calendar
    #[arg(short, long, conflicts_with_all = ["month", "categories"])]
    pub list: bool,
}

pub fn handle_show_command(workspace: &Workspace, args: ShowArgs) -> CalendarResult<()> {
    let user = workspace.user(args.user);

    if args.list {
        let months = workspace.store.list(&user)?;
        if months.is_empty() {
            println!("No calendars stored for '{}'.", user);
        } else {
            println!("Calendars for '{}':", user);
            for month in months {
                println!("  {}", month);
            }
        }
        return Ok(());
    }

    let period = parse_month(args.month.as_deref())?;
    let days = workspace.store.load(&user, &period)?;

    println!("{} budget calendar for '{}'", period, user);
    if args.categories {
        println!("{}", format_category_summary(&days, workspace.symbol()));
    } else {
        println!("{}", format_calendar(&days, workspace.symbol()));
    }
    Ok(())
}
