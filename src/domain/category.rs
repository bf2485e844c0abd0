//! Domain types representing transaction categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::EntryKind;

/// Label shown when a transaction references a category that no longer resolves.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Classifies transactions for reporting and filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Category {
    /// Builds a category with a freshly generated identifier.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Starter categories used when nothing has been persisted yet.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::with_id("1", "Salary", EntryKind::Income),
        Category::with_id("2", "Freelance", EntryKind::Income),
        Category::with_id("3", "Food", EntryKind::Expense),
        Category::with_id("4", "Transport", EntryKind::Expense),
        Category::with_id("5", "Entertainment", EntryKind::Expense),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn category_json_uses_type_field() {
        let category = Category::with_id("3", "Food", EntryKind::Expense);
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["id"], "3");
    }

    #[test]
    fn seed_set_has_five_categories_with_distinct_ids() {
        let seeds = default_categories();
        assert_eq!(seeds.len(), 5);
        let ids: HashSet<&str> = seeds.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(seeds.iter().filter(|c| c.kind == EntryKind::Income).count(), 2);
    }
}
