//! Change summaries for audit entries

use crate::models::CalendarDay;

/// Describe how day totals differ between two versions of a calendar
///
/// Days are matched by date. Returns `None` when no day total changed.
pub fn day_total_changes(before: &[CalendarDay], after: &[CalendarDay]) -> Option<String> {
    let changes: Vec<String> = before
        .iter()
        .filter_map(|old| {
            let new_total = after
                .iter()
                .find(|d| d.date == old.date)
                .map(CalendarDay::total)
                .unwrap_or_default();
            (new_total != old.total())
                .then(|| format!("{}: {} -> {}", old.date, old.total(), new_total))
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
