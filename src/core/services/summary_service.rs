//! Aggregation helpers for totals and time-bucketed breakdowns.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{EntryKind, Transaction};

/// Income and expense accumulated for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotals {
    fn add(&mut self, kind: EntryKind, amount: f64) {
        match kind {
            EntryKind::Income => self.income += amount,
            EntryKind::Expense => self.expense += amount,
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Sum of a single category/type pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: String,
    pub kind: EntryKind,
    pub total: f64,
}

/// Derived view over a transaction collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    /// Keyed by [`SummaryService::month_key`]; iteration follows plain string order.
    pub monthly: BTreeMap<String, MonthlyTotals>,
    /// First-seen order of `(category, type)` pairs.
    pub by_category: Vec<CategoryTotal>,
}

/// Aggregates transaction collections into summaries. Stateless; every call
/// recomputes from its input.
pub struct SummaryService;

impl SummaryService {
    pub fn summarize(transactions: &[Transaction]) -> Summary {
        let mut summary = Summary::default();
        for txn in transactions {
            match txn.kind {
                EntryKind::Income => summary.total_income += txn.amount,
                EntryKind::Expense => summary.total_expense += txn.amount,
            }
            summary
                .monthly
                .entry(Self::month_key(txn.date))
                .or_default()
                .add(txn.kind, txn.amount);
            match summary
                .by_category
                .iter_mut()
                .find(|entry| entry.category_id == txn.category_id && entry.kind == txn.kind)
            {
                Some(entry) => entry.total += txn.amount,
                None => summary.by_category.push(CategoryTotal {
                    category_id: txn.category_id.clone(),
                    kind: txn.kind,
                    total: txn.amount,
                }),
            }
        }
        summary.balance = summary.total_income - summary.total_expense;
        summary
    }

    /// `year-month` with the month unpadded (`2024-3`).
    ///
    /// Not zero-padded, so string ordering puts `2024-10` before `2024-2`.
    pub fn month_key(date: NaiveDate) -> String {
        format!("{}-{}", date.year(), date.month())
    }

    /// Month keys in the order charts display them (plain string order).
    pub fn sorted_months(summary: &Summary) -> Vec<&str> {
        summary.monthly.keys().map(String::as_str).collect()
    }

    pub fn total_for(transactions: &[Transaction], kind: EntryKind) -> f64 {
        transactions
            .iter()
            .filter(|txn| txn.kind == kind)
            .map(|txn| txn.amount)
            .sum()
    }
}
