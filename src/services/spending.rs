//! Spending ingestion
//!
//! Records actual spending on calendar days and imports spending exports from
//! CSV. This is the only code that writes `spent_by_category`.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CalendarError, CalendarResult};
use crate::models::{
    parse_key, CalendarDay, CategoryCatalog, CategoryKey, Money, MonthPeriod, SpendingLedger,
};

/// Date formats tried after the configured one
const FALLBACK_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y",
];

/// Column layout of a spending CSV
#[derive(Debug, Clone)]
pub struct SpendingColumns {
    pub date_column: usize,
    pub category_column: usize,
    pub amount_column: usize,
    /// Date format string (e.g., "%Y-%m-%d", "%m/%d/%Y")
    pub date_format: String,
    pub has_header: bool,
    pub delimiter: char,
    /// Some banks export purchases as negative amounts
    pub invert_amounts: bool,
}

impl Default for SpendingColumns {
    fn default() -> Self {
        Self {
            date_column: 0,
            category_column: 1,
            amount_column: 2,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: ',',
            invert_amounts: false,
        }
    }
}

impl SpendingColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_inverted_amounts(mut self, invert: bool) -> Self {
        self.invert_amounts = invert;
        self
    }

    /// Locate the date, category and amount columns from a header row.
    ///
    /// Columns that cannot be found keep their current index.
    pub fn detect_from_headers(mut self, headers: &StringRecord) -> Self {
        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            if h.contains("date") || h.contains("posted") {
                self.date_column = idx;
            } else if h.contains("category") || h.contains("envelope") {
                self.category_column = idx;
            } else if h.contains("amount") || h.contains("spent") || h.contains("debit") {
                self.amount_column = idx;
            }
        }
        self
    }
}

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based data row number, not counting the header
    pub row: usize,
    pub message: String,
}

/// Result of a CSV import
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub ledger: SpendingLedger,
    pub rows_read: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.rows_read - self.errors.len()
    }
}

/// Records spending against a calendar
#[derive(Debug, Clone, Default)]
pub struct SpendingService {
    catalog: CategoryCatalog,
}

impl SpendingService {
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self { catalog }
    }

    /// Add one spending entry to the matching calendar day
    pub fn record(
        &self,
        days: &mut [CalendarDay],
        date: NaiveDate,
        category: &CategoryKey,
        amount: Money,
    ) -> CalendarResult<()> {
        let index = self.check_entry(days, date, category, amount)?;
        days[index].record_spent(category, amount);
        debug!(date = %date, category = %category, amount = %amount, "Recorded spending");
        Ok(())
    }

    /// Add every entry of `ledger` to the calendar.
    ///
    /// All entries are checked before any is applied, so a bad entry leaves
    /// the calendar unchanged.
    pub fn apply_ledger(
        &self,
        days: &mut [CalendarDay],
        ledger: &SpendingLedger,
    ) -> CalendarResult<()> {
        let mut targets = Vec::new();
        for (date, category, amount) in ledger.entries() {
            let index = self.check_entry(days, date, category, amount)?;
            targets.push((index, category, amount));
        }
        for (index, category, amount) in targets {
            days[index].record_spent(category, amount);
        }
        info!(
            entries = ledger.entries().count(),
            total = %ledger.total(),
            "Applied spending ledger"
        );
        Ok(())
    }

    /// Parse spending rows for `period` from a CSV file
    pub fn import_csv_file(
        &self,
        path: &Path,
        columns: &SpendingColumns,
        period: &MonthPeriod,
    ) -> CalendarResult<ImportSummary> {
        let file = std::fs::File::open(path).map_err(|e| {
            CalendarError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.import_csv(file, columns, period)
    }

    /// Parse spending rows for `period` from any reader.
    ///
    /// Bad rows are collected in the summary rather than failing the import.
    pub fn import_csv<R: Read>(
        &self,
        reader: R,
        columns: &SpendingColumns,
        period: &MonthPeriod,
    ) -> CalendarResult<ImportSummary> {
        let delimiter = u8::try_from(columns.delimiter).map_err(|_| {
            CalendarError::Import(format!("Unsupported delimiter '{}'", columns.delimiter))
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(columns.has_header)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let columns = if columns.has_header {
            let headers = reader
                .headers()
                .map_err(|e| CalendarError::Import(format!("Failed to read header: {}", e)))?;
            columns.clone().detect_from_headers(headers)
        } else {
            columns.clone()
        };

        let mut summary = ImportSummary::default();
        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            summary.rows_read += 1;
            let parsed = result
                .map_err(|e| format!("Error reading CSV record: {}", e))
                .and_then(|record| self.parse_record(&record, &columns, period));
            match parsed {
                Ok((date, category, amount)) => summary.ledger.record(date, category, amount),
                Err(message) => {
                    warn!(row, error = %message, "Skipping spending row");
                    summary.errors.push(RowError { row, message });
                }
            }
        }

        info!(
            month = %period,
            rows = summary.rows_read,
            imported = summary.imported(),
            skipped = summary.errors.len(),
            "Parsed spending CSV"
        );
        Ok(summary)
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        columns: &SpendingColumns,
        period: &MonthPeriod,
    ) -> Result<(NaiveDate, CategoryKey, Money), String> {
        let date_str = field(record, columns.date_column, "date")?;
        let date = parse_date(date_str, &columns.date_format)?;
        if !period.contains(date) {
            return Err(format!("{} is outside {}", date, period));
        }

        let category = parse_key(field(record, columns.category_column, "category")?)
            .map_err(|e| e.to_string())?;
        self.catalog.require(&category).map_err(|e| e.to_string())?;

        let amount_str = field(record, columns.amount_column, "amount")?;
        let mut amount = Money::parse(amount_str)
            .map_err(|e| format!("Invalid amount '{}': {}", amount_str, e))?;
        if columns.invert_amounts {
            amount = -amount;
        }
        if amount.is_negative() {
            return Err(format!("Spending cannot be negative: {}", amount));
        }

        Ok((date, category, amount))
    }

    /// Validate an entry and return the index of its calendar day
    fn check_entry(
        &self,
        days: &[CalendarDay],
        date: NaiveDate,
        category: &CategoryKey,
        amount: Money,
    ) -> CalendarResult<usize> {
        self.catalog.require(category)?;
        if amount.is_negative() {
            return Err(CalendarError::NegativeAmount {
                context: format!("{} spending on {}", category, date),
                amount,
            });
        }
        days.iter().position(|d| d.date == date).ok_or_else(|| {
            CalendarError::InvalidDateRange(format!("{} is not a day of this calendar", date))
        })
    }
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str, String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing {} column", name))
}

fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
        return Ok(date);
    }
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> CategoryKey {
        CategoryKey::new(name).unwrap()
    }

    fn march() -> MonthPeriod {
        MonthPeriod::new(2025, 3).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn calendar() -> Vec<CalendarDay> {
        march().dates().map(CalendarDay::new).collect()
    }

    #[test]
    fn test_record_spending() {
        let service = SpendingService::default();
        let mut days = calendar();
        service
            .record(&mut days, date(7), &key("dining"), Money::from_cents(17000))
            .unwrap();
        assert_eq!(days[6].spent(&key("dining")), Money::from_cents(17000));
        assert_eq!(days[6].total(), Money::zero());
    }

    #[test]
    fn test_record_rejects_bad_entries() {
        let service = SpendingService::default();
        let mut days = calendar();
        let april = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        let err = service
            .record(&mut days, april, &key("dining"), Money::from_cents(1))
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDateRange(_)));

        let err = service
            .record(&mut days, date(1), &key("yachts"), Money::from_cents(1))
            .unwrap_err();
        assert!(matches!(err, CalendarError::UnknownCategory(_)));

        let err = service
            .record(&mut days, date(1), &key("dining"), Money::from_cents(-1))
            .unwrap_err();
        assert!(matches!(err, CalendarError::NegativeAmount { .. }));
    }

    #[test]
    fn test_apply_ledger_is_all_or_nothing() {
        let service = SpendingService::default();
        let mut days = calendar();
        let ledger = SpendingLedger::new()
            .with(date(2), key("coffee"), Money::from_cents(450))
            .with(date(3), key("yachts"), Money::from_cents(100));
        assert!(service.apply_ledger(&mut days, &ledger).is_err());
        assert!(days.iter().all(|d| d.spent_total().is_zero()));

        let ledger = SpendingLedger::new().with(date(2), key("coffee"), Money::from_cents(450));
        service.apply_ledger(&mut days, &ledger).unwrap();
        assert_eq!(SpendingLedger::from_calendar(&days), ledger);
    }

    #[test]
    fn test_import_csv() {
        let csv = "\
Date,Category,Amount
2025-03-07,dining,120.00
2025-03-07,Dining,50.00
03/08/2025,coffee,4.50
2025-04-01,dining,10.00
2025-03-09,yachts,10.00
2025-03-09,dining,-3.00
";
        let summary = SpendingService::default()
            .import_csv(csv.as_bytes(), &SpendingColumns::default(), &march())
            .unwrap();

        assert_eq!(summary.rows_read, 6);
        assert_eq!(summary.imported(), 3);
        assert_eq!(
            summary.errors.iter().map(|e| e.row).collect::<Vec<_>>(),
            vec![4, 5, 6]
        );
        assert_eq!(
            summary.ledger.spent_on(date(7), &key("dining")),
            Money::from_cents(17000)
        );
        assert_eq!(summary.ledger.spent_on(date(8), &key("coffee")), Money::from_cents(450));
    }

    #[test]
    fn test_import_detects_reordered_columns() {
        let csv = "Amount;Posted;Envelope\n-12.34;2025-03-03;groceries\n";
        let columns = SpendingColumns::new()
            .with_delimiter(';')
            .with_inverted_amounts(true);
        let summary = SpendingService::default()
            .import_csv(csv.as_bytes(), &columns, &march())
            .unwrap();
        assert!(summary.errors.is_empty());
        assert_eq!(summary.ledger.total(), Money::from_cents(1234));
    }

    #[test]
    fn test_import_without_header() {
        let csv = "2025-03-03,groceries,20\n";
        let columns = SpendingColumns::new().with_header(false);
        let summary = SpendingService::default()
            .import_csv(csv.as_bytes(), &columns, &march())
            .unwrap();
        assert_eq!(summary.ledger.day_total(date(3)), Money::from_cents(2000));
    }
}
