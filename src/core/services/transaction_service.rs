//! Business logic helpers for managing transactions.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{NewTransaction, Tracker, Transaction};

/// Provides validated append/remove helpers for tracker transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates `draft`, assigns an id, appends it, and returns the stored record.
    pub fn add(tracker: &mut Tracker, draft: NewTransaction) -> ServiceResult<Transaction> {
        Self::validate(&draft)?;
        let notes = draft
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());
        let txn = Transaction::new(
            draft.kind,
            draft.amount,
            draft.date,
            draft.category_id.trim(),
            notes,
        );
        tracing::info!(id = %txn.id, kind = %txn.kind, amount = txn.amount, "transaction added");
        Ok(tracker.add_transaction(txn).clone())
    }

    /// Removes the first transaction identified by `id`, returning the removed instance.
    pub fn remove(tracker: &mut Tracker, id: &str) -> ServiceResult<Transaction> {
        let removed = tracker
            .remove_transaction(id.trim())
            .ok_or_else(|| ServiceError::Invalid(format!("Transaction `{}` not found", id)))?;
        tracing::info!(id = %removed.id, "transaction removed");
        Ok(removed)
    }

    /// Returns a snapshot of the tracker's transactions.
    pub fn list(tracker: &Tracker) -> Vec<&Transaction> {
        tracker.transactions.iter().collect()
    }

    fn validate(draft: &NewTransaction) -> ServiceResult<()> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "Amount must be a positive number".into(),
            ));
        }
        if draft.category_id.trim().is_empty() {
            return Err(ServiceError::Invalid("A category is required".into()));
        }
        Ok(())
    }
}
