//! Domain types representing recorded money movements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::EntryKind;

/// A single income or expense entry.
///
/// `amount` is expected to be positive; values loaded from storage are not
/// re-validated, so consumers must tolerate zero or negative legacy amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Transaction {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        date: NaiveDate,
        category_id: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            date,
            category_id: category_id.into(),
            notes,
            kind,
        }
    }
}

/// Caller-supplied fields for a transaction that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: EntryKind,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: String,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        date: NaiveDate,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            date,
            category_id: category_id.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
