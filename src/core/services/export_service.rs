//! CSV export of transaction history.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::core::services::ServiceResult;
use crate::core::utils::{ensure_dir, write_atomic};
use crate::domain::{tracker::category_name_in, Category, Transaction};

pub const CSV_HEADER: &str = "Date,Type,Amount,Category,Notes";
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Serializes transactions into quoted, comma-separated documents.
pub struct ExportService;

impl ExportService {
    /// Builds the CSV document, or `None` when there is nothing to export.
    ///
    /// Every field is double-quoted with embedded quotes doubled. Lines are
    /// joined with `\n` and the document has no trailing newline.
    pub fn to_csv(transactions: &[Transaction], categories: &[Category]) -> Option<String> {
        if transactions.is_empty() {
            return None;
        }
        let mut lines = Vec::with_capacity(transactions.len() + 1);
        lines.push(CSV_HEADER.to_string());
        for txn in transactions {
            let date = txn.date.format("%Y-%m-%d").to_string();
            let amount = txn.amount.to_string();
            let fields = [
                date.as_str(),
                txn.kind.as_str(),
                amount.as_str(),
                category_name_in(categories, &txn.category_id),
                txn.notes.as_deref().unwrap_or(""),
            ];
            let row: Vec<String> = fields.iter().map(|field| quote_field(field)).collect();
            lines.push(row.join(","));
        }
        Some(lines.join("\n"))
    }

    /// `transactions_<YYYY-MM-DD>.csv` for the given export day.
    pub fn file_name(date: NaiveDate) -> String {
        format!("transactions_{}.csv", date.format("%Y-%m-%d"))
    }

    /// Writes the export document into `dir`, returning the written path.
    ///
    /// Returns `Ok(None)` without touching the filesystem for an empty collection.
    pub fn write_to_dir(
        dir: &Path,
        transactions: &[Transaction],
        categories: &[Category],
        date: NaiveDate,
    ) -> ServiceResult<Option<PathBuf>> {
        let Some(document) = Self::to_csv(transactions, categories) else {
            tracing::debug!("export skipped: no transactions");
            return Ok(None);
        };
        ensure_dir(dir)?;
        let path = dir.join(Self::file_name(date));
        write_atomic(&path, &document)?;
        tracing::info!(path = %path.display(), rows = transactions.len(), "exported transactions");
        Ok(Some(path))
    }
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{default_categories, EntryKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quotes_and_escapes_fields() {
        let txn = Transaction::new(
            EntryKind::Income,
            100.0,
            date(2024, 1, 5),
            "1",
            Some("He said \"hi\"".into()),
        );
        let csv = ExportService::to_csv(&[txn], &default_categories()).unwrap();
        assert_eq!(
            csv,
            "Date,Type,Amount,Category,Notes\n\"2024-01-05\",\"income\",\"100\",\"Salary\",\"He said \"\"hi\"\"\""
        );
    }

    #[test]
    fn empty_collection_produces_no_document() {
        assert_eq!(ExportService::to_csv(&[], &default_categories()), None);
    }

    #[test]
    fn unresolved_category_and_missing_notes() {
        let txn = Transaction::new(EntryKind::Expense, 12.5, date(2024, 2, 29), "gone", None);
        let csv = ExportService::to_csv(&[txn], &default_categories()).unwrap();
        let last = csv.lines().last().unwrap();
        assert_eq!(last, "\"2024-02-29\",\"expense\",\"12.5\",\"Unknown\",\"\"");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn file_name_uses_iso_day() {
        assert_eq!(
            ExportService::file_name(date(2024, 7, 4)),
            "transactions_2024-07-04.csv"
        );
    }

    #[test]
    fn write_to_dir_skips_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let written =
            ExportService::write_to_dir(&target, &[], &default_categories(), date(2024, 1, 1))
                .unwrap();
        assert!(written.is_none());
        assert!(!target.exists());
    }
}
