//! Business logic helpers for category management.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Category, EntryKind, Tracker};

/// Provides validated operations for [`Category`] entities.
///
/// Categories are append-only: there is no edit or remove.
pub struct CategoryService;

impl CategoryService {
    /// Creates a category from a trimmed, non-empty name and returns it so the
    /// caller can reference the new id right away.
    pub fn add(tracker: &mut Tracker, name: &str, kind: EntryKind) -> ServiceResult<Category> {
        let name = Self::validate_name(name)?;
        let category = Category::new(name, kind);
        tracing::info!(id = %category.id, name = %category.name, %kind, "category added");
        Ok(tracker.add_category(category).clone())
    }

    /// Returns a snapshot of all categories in display order.
    pub fn list(tracker: &Tracker) -> Vec<&Category> {
        tracker.categories.iter().collect()
    }

    /// Categories offered for a transaction of `kind`.
    pub fn for_kind(tracker: &Tracker, kind: EntryKind) -> Vec<&Category> {
        tracker.categories_of_kind(kind).collect()
    }

    /// Looks a category up by id, then by case-insensitive name.
    pub fn resolve<'a>(tracker: &'a Tracker, token: &str) -> Option<&'a Category> {
        let token = token.trim();
        tracker.category(token).or_else(|| {
            let needle = token.to_lowercase();
            tracker
                .categories
                .iter()
                .find(|category| category.name.to_lowercase() == needle)
        })
    }

    fn validate_name(candidate: &str) -> ServiceResult<&str> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(ServiceError::Invalid(
                "Category name cannot be empty".into(),
            ))
        } else {
            Ok(trimmed)
        }
    }
}
