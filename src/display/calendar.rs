//! Calendar table formatting

use std::collections::BTreeMap;

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::short_date;
use crate::models::{calendar_total, CalendarDay, CategoryKey, Money};
use crate::services::{DayClassification, DayStatus};

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Left")]
    left: String,
    #[tabled(rename = "Categories")]
    categories: String,
}

/// Format a calendar as one row per day, followed by the month total
pub fn format_calendar(days: &[CalendarDay], symbol: &str) -> String {
    if days.is_empty() {
        return "Calendar has no days.".to_string();
    }

    let rows: Vec<DayRow> = days
        .iter()
        .map(|day| DayRow {
            date: short_date(day.date),
            planned: day.total().format_with_symbol(symbol),
            spent: day.spent_total().format_with_symbol(symbol),
            left: (day.total() - day.spent_total()).format_with_symbol(symbol),
            categories: day
                .planned_by_category()
                .iter()
                .map(|(key, amount)| format!("{} {}", key, amount.format_with_symbol(symbol)))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    let spent: Money = days.iter().map(CalendarDay::spent_total).sum();
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()));

    format!(
        "{}\nMonth total: {}  Spent: {}\n",
        table,
        calendar_total(days).format_with_symbol(symbol),
        spent.format_with_symbol(symbol)
    )
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Days")]
    days: usize,
}

/// Format month totals per category
pub fn format_category_summary(days: &[CalendarDay], symbol: &str) -> String {
    let mut totals: BTreeMap<&CategoryKey, (Money, Money, usize)> = BTreeMap::new();
    for day in days {
        for (key, amount) in day.planned_by_category() {
            let entry = totals.entry(key).or_default();
            entry.0 += *amount;
            entry.2 += 1;
        }
        for (key, amount) in day.spent_by_category() {
            totals.entry(key).or_default().1 += *amount;
        }
    }

    if totals.is_empty() {
        return "No categories planned.".to_string();
    }

    let rows: Vec<CategoryRow> = totals
        .into_iter()
        .map(|(key, (planned, spent, days))| CategoryRow {
            category: key.to_string(),
            planned: planned.format_with_symbol(symbol),
            spent: spent.format_with_symbol(symbol),
            days,
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Delta")]
    delta: String,
}

/// Format the OVER and UNDER days of a classification; balanced and upcoming
/// days are left out
pub fn format_classification(classes: &[DayClassification], symbol: &str) -> String {
    let rows: Vec<StatusRow> = classes
        .iter()
        .filter(|c| matches!(c.status, DayStatus::Over | DayStatus::Under))
        .map(|c| StatusRow {
            date: short_date(c.date),
            status: match c.status {
                DayStatus::Over => "over",
                _ => "under",
            },
            planned: c.planned.format_with_symbol(symbol),
            spent: c.spent.format_with_symbol(symbol),
            delta: c.delta.format_with_symbol(symbol),
        })
        .collect();

    if rows.is_empty() {
        return "Every day so far is on budget.".to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
