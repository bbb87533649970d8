//! Transfer messages and ledger formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::short_date;
use crate::models::Transfer;
use crate::services::{RedistributionOutcome, UncoveredDeficit};

/// One sentence describing a transfer, e.g.
/// "Moved $35.00 from Sat Mar 8 to cover Fri Mar 7's dining overspend"
pub fn transfer_message(transfer: &Transfer, symbol: &str) -> String {
    let source = if transfer.crosses_categories() {
        format!(" of {} budget", transfer.source_category)
    } else {
        String::new()
    };
    format!(
        "Moved {}{} from {} to cover {}'s {} overspend",
        transfer.amount.format_with_symbol(symbol),
        source,
        short_date(transfer.from_date),
        short_date(transfer.to_date),
        transfer.category
    )
}

pub fn uncovered_message(deficit: &UncoveredDeficit, symbol: &str) -> String {
    format!(
        "{} is still {} over budget; no days left to cover it",
        short_date(deficit.date),
        deficit.amount.format_with_symbol(symbol)
    )
}

/// Messages for every transfer, then every uncovered deficit
pub fn format_outcome(outcome: &RedistributionOutcome, symbol: &str) -> String {
    if outcome.transfers.is_empty() && outcome.uncovered.is_empty() {
        return "Calendar is balanced; nothing to move.".to_string();
    }

    let mut lines: Vec<String> = outcome
        .transfers
        .iter()
        .map(|t| transfer_message(t, symbol))
        .collect();
    lines.extend(outcome.uncovered.iter().map(|u| uncovered_message(u, symbol)));
    lines.join("\n")
}

#[derive(Tabled)]
struct TransferRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format recorded transfers as a table
pub fn format_transfer_ledger(transfers: &[Transfer], symbol: &str) -> String {
    if transfers.is_empty() {
        return "No transfers recorded.".to_string();
    }

    let rows: Vec<TransferRow> = transfers
        .iter()
        .map(|t| TransferRow {
            id: t.id.to_string(),
            from: format!("{} ({})", short_date(t.from_date), t.source_category),
            to: format!("{} ({})", short_date(t.to_date), t.category),
            category: t.category.to_string(),
            amount: t.amount.format_with_symbol(symbol),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKey, Money};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn transfer(source: &str) -> Transfer {
        Transfer::coverage(
            "run",
            date(9),
            date(7),
            CategoryKey::new(source).unwrap(),
            CategoryKey::new("dining").unwrap(),
            Money::from_cents(2000),
            0,
        )
    }

    #[test]
    fn test_transfer_message() {
        assert_eq!(
            transfer_message(&transfer("dining"), "$"),
            "Moved $20.00 from Sun Mar 9 to cover Fri Mar 7's dining overspend"
        );
        assert_eq!(
            transfer_message(&transfer("coffee"), "$"),
            "Moved $20.00 of coffee budget from Sun Mar 9 to cover Fri Mar 7's dining overspend"
        );
    }

    #[test]
    fn test_outcome_lists_uncovered_days() {
        let outcome = RedistributionOutcome {
            calendar: Vec::new(),
            transfers: vec![transfer("dining")],
            uncovered: vec![UncoveredDeficit {
                date: date(7),
                amount: Money::from_cents(1000),
            }],
        };
        let text = format_outcome(&outcome, "$");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Fri Mar 7 is still $10.00 over budget; no days left to cover it"
        );
    }

    #[test]
    fn test_ledger_table() {
        let table = format_transfer_ledger(&[transfer("coffee")], "$");
        assert!(table.contains("Sun Mar 9 (coffee)"));
        assert!(table.contains("$20.00"));
        assert_eq!(format_transfer_ledger(&[], "$"), "No transfers recorded.");
    }
}
