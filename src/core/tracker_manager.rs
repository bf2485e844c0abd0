use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::core::errors::{Result, TrackerError};
use crate::core::services::{
    CategoryService, ExportService, FilterService, ServiceError, Summary, SummaryService,
    TransactionFilter, TransactionService,
};
use crate::domain::{default_categories, Category, EntryKind, NewTransaction, Tracker, Transaction};
use crate::storage::{
    load_collection, save_collection, KeyValueStore, CATEGORIES_KEY, TRANSACTIONS_KEY,
};

/// Errors raised by manager mutations.
///
/// `Rejected` leaves state untouched. `Persist` means the in-memory change
/// was applied but the snapshot could not be written.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("{0}")]
    Rejected(String),
    #[error("change applied but not saved: {source}")]
    Persist {
        #[source]
        source: TrackerError,
    },
}

impl From<ServiceError> for MutationError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Invalid(message) => MutationError::Rejected(message),
            ServiceError::Core(source) => MutationError::Persist { source },
        }
    }
}

/// Owns the tracker snapshot and the store it is persisted to.
///
/// Every mutation saves the full affected collection right after it is
/// applied in memory.
pub struct TrackerManager {
    tracker: Tracker,
    store: Box<dyn KeyValueStore>,
}

impl TrackerManager {
    /// Loads both collections, seeding categories when none were stored.
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let transactions: Vec<Transaction> =
            load_collection(store.as_ref(), TRANSACTIONS_KEY, Vec::new)?;
        let categories: Vec<Category> =
            load_collection(store.as_ref(), CATEGORIES_KEY, default_categories)?;
        tracing::info!(
            transactions = transactions.len(),
            categories = categories.len(),
            "tracker loaded"
        );
        Ok(Self {
            tracker: Tracker::new(transactions, categories),
            store,
        })
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn add_transaction(
        &mut self,
        draft: NewTransaction,
    ) -> std::result::Result<Transaction, MutationError> {
        let txn = TransactionService::add(&mut self.tracker, draft)?;
        self.persist_transactions()?;
        Ok(txn)
    }

    pub fn delete_transaction(&mut self, id: &str) -> std::result::Result<Transaction, MutationError> {
        let removed = TransactionService::remove(&mut self.tracker, id)?;
        self.persist_transactions()?;
        Ok(removed)
    }

    pub fn add_category(
        &mut self,
        name: &str,
        kind: EntryKind,
    ) -> std::result::Result<Category, MutationError> {
        let category = CategoryService::add(&mut self.tracker, name, kind)?;
        self.persist_categories()?;
        Ok(category)
    }

    pub fn summary(&self) -> Summary {
        SummaryService::summarize(&self.tracker.transactions)
    }

    pub fn filtered(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        FilterService::apply(&self.tracker.transactions, filter)
    }

    pub fn export_csv(&self) -> Option<String> {
        ExportService::to_csv(&self.tracker.transactions, &self.tracker.categories)
    }

    pub fn export_to_dir(
        &self,
        dir: &Path,
        date: NaiveDate,
    ) -> std::result::Result<Option<PathBuf>, ServiceError> {
        ExportService::write_to_dir(
            dir,
            &self.tracker.transactions,
            &self.tracker.categories,
            date,
        )
    }

    fn persist_transactions(&self) -> std::result::Result<(), MutationError> {
        save_collection(self.store(), TRANSACTIONS_KEY, &self.tracker.transactions)
            .map_err(|source| self.persist_failed(TRANSACTIONS_KEY, source))
    }

    fn persist_categories(&self) -> std::result::Result<(), MutationError> {
        save_collection(self.store(), CATEGORIES_KEY, &self.tracker.categories)
            .map_err(|source| self.persist_failed(CATEGORIES_KEY, source))
    }

    fn persist_failed(&self, key: &str, source: TrackerError) -> MutationError {
        tracing::warn!(key, error = %source, "failed to persist collection");
        MutationError::Persist { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    /// Store handle that can be shared between the manager and the test body.
    #[derive(Clone, Default)]
    struct SharedStore {
        inner: Arc<MemoryStore>,
        fail_writes: Arc<std::sync::atomic::AtomicBool>,
    }

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(TrackerError::Storage("disk full".into()));
            }
            self.inner.set(key, value)
        }
    }

    fn draft(amount: f64) -> NewTransaction {
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        NewTransaction::new(EntryKind::Expense, amount, date, "3")
    }

    #[test]
    fn open_seeds_categories_and_empty_history() {
        let manager = TrackerManager::open(Box::new(MemoryStore::new())).unwrap();
        assert_eq!(manager.tracker().categories, default_categories());
        assert!(manager.tracker().transactions.is_empty());
    }

    #[test]
    fn mutations_persist_full_collections() {
        let store = SharedStore::default();
        let mut manager = TrackerManager::open(Box::new(store.clone())).unwrap();

        let txn = manager.add_transaction(draft(9.5)).unwrap();
        let category = manager.add_category("Pets", EntryKind::Expense).unwrap();

        let reopened = TrackerManager::open(Box::new(store.clone())).unwrap();
        assert_eq!(reopened.tracker().transactions, vec![txn.clone()]);
        assert_eq!(reopened.tracker().categories.len(), 6);
        assert_eq!(reopened.tracker().category(&category.id), Some(&category));

        manager.delete_transaction(&txn.id).unwrap();
        let reopened = TrackerManager::open(Box::new(store)).unwrap();
        assert!(reopened.tracker().transactions.is_empty());
    }

    #[test]
    fn rejected_mutation_does_not_write() {
        let store = SharedStore::default();
        let mut manager = TrackerManager::open(Box::new(store.clone())).unwrap();
        let err = manager.add_category("   ", EntryKind::Income).unwrap_err();
        assert!(matches!(err, MutationError::Rejected(_)));
        assert!(store.inner.is_empty());
    }

    #[test]
    fn write_failure_is_reported_and_memory_kept() {
        let store = SharedStore::default();
        let mut manager = TrackerManager::open(Box::new(store.clone())).unwrap();
        store
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let err = manager.add_transaction(draft(1.0)).unwrap_err();
        assert!(matches!(err, MutationError::Persist { .. }), "unexpected error: {err:?}");
        assert_eq!(manager.tracker().transaction_count(), 1);
    }

    #[test]
    fn corrupt_store_fails_to_open() {
        let store = MemoryStore::new();
        store.set(CATEGORIES_KEY, "nope").unwrap();
        let err = TrackerManager::open(Box::new(store)).err().expect("corrupt");
        assert!(matches!(err, TrackerError::Corrupt { .. }));
    }
}
