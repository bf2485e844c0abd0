//! In-memory snapshot of everything the tracker owns.

use serde::{Deserialize, Serialize};

use crate::domain::{
    category::{default_categories, Category, UNKNOWN_CATEGORY_LABEL},
    common::EntryKind,
    transaction::Transaction,
};

/// Ordered collections of transactions and categories.
///
/// Insertion order is display order. Entities are never edited in place;
/// mutations append or remove whole records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tracker {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            categories: default_categories(),
        }
    }
}

impl Tracker {
    pub fn new(transactions: Vec<Transaction>, categories: Vec<Category>) -> Self {
        Self {
            transactions,
            categories,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn add_category(&mut self, category: Category) -> &Category {
        self.categories.push(category);
        &self.categories[self.categories.len() - 1]
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> &Transaction {
        self.transactions.push(transaction);
        &self.transactions[self.transactions.len() - 1]
    }

    /// Removes the first transaction carrying `id`.
    pub fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Display name for `id`, falling back to a placeholder for dangling references.
    pub fn category_name(&self, id: &str) -> &str {
        category_name_in(&self.categories, id)
    }

    pub fn categories_of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |category| category.kind == kind)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Resolves a category name within an arbitrary slice.
pub fn category_name_in<'a>(categories: &'a [Category], id: &str) -> &'a str {
    categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.name.as_str())
        .unwrap_or(UNKNOWN_CATEGORY_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(id: &str) -> Transaction {
        let mut txn = Transaction::new(
            EntryKind::Expense,
            10.0,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "3",
            None,
        );
        txn.id = id.into();
        txn
    }

    #[test]
    fn remove_transaction_drops_first_match_only() {
        let mut tracker = Tracker::default();
        tracker.add_transaction(txn("dup"));
        tracker.add_transaction(txn("other"));
        tracker.add_transaction(txn("dup"));

        let removed = tracker.remove_transaction("dup").expect("removed");
        assert_eq!(removed.id, "dup");
        let ids: Vec<_> = tracker.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["other", "dup"]);
    }

    #[test]
    fn dangling_category_falls_back_to_placeholder() {
        let tracker = Tracker::default();
        assert_eq!(tracker.category_name("1"), "Salary");
        assert_eq!(tracker.category_name("deleted"), UNKNOWN_CATEGORY_LABEL);
    }

    #[test]
    fn categories_of_kind_filters_by_type() {
        let tracker = Tracker::default();
        let names: Vec<_> = tracker
            .categories_of_kind(EntryKind::Income)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Salary", "Freelance"]);
    }
}
