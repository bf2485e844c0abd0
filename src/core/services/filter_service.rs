//! Transaction history filtering.

use chrono::NaiveDate;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{EntryKind, Transaction};

/// Type criterion of a [`TransactionFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(EntryKind),
}

/// Category criterion of a [`TransactionFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(String),
}

/// Conjunction of type, category and inclusive date-range criteria.
///
/// The default value filters nothing out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: KindFilter,
    pub category: CategoryFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = KindFilter::Only(kind);
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category = CategoryFilter::Id(category_id.into());
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// `false` when every criterion is at its "all" value.
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let KindFilter::Only(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        if let CategoryFilter::Id(ref id) = self.category {
            if txn.category_id != *id {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        true
    }

    /// Applies a single `field=value` criterion. `value` of `all` (or empty)
    /// resets that field.
    pub fn apply_token(&mut self, token: &str) -> ServiceResult<()> {
        let (field, value) = token.split_once('=').ok_or_else(|| {
            ServiceError::Invalid(format!(
                "invalid filter `{}` (expected field=value)",
                token
            ))
        })?;
        let value = value.trim();
        let reset = value.is_empty() || value.eq_ignore_ascii_case("all");
        match field.trim().to_ascii_lowercase().as_str() {
            "type" => {
                self.kind = if reset {
                    KindFilter::All
                } else {
                    let kind = value
                        .parse::<EntryKind>()
                        .map_err(|err| ServiceError::Invalid(err.to_string()))?;
                    KindFilter::Only(kind)
                };
            }
            "category" => {
                self.category = if reset {
                    CategoryFilter::All
                } else {
                    CategoryFilter::Id(value.to_string())
                };
            }
            "from" | "start" => {
                self.start_date = if reset { None } else { Some(parse_filter_date(value)?) };
            }
            "to" | "end" => {
                self.end_date = if reset { None } else { Some(parse_filter_date(value)?) };
            }
            other => {
                return Err(ServiceError::Invalid(format!(
                    "unknown filter field `{}` (use type, category, from, to)",
                    other
                )))
            }
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        let kind = match self.kind {
            KindFilter::All => "all".to_string(),
            KindFilter::Only(kind) => kind.to_string(),
        };
        let category = match &self.category {
            CategoryFilter::All => "all",
            CategoryFilter::Id(id) => id.as_str(),
        };
        let bound = |date: Option<NaiveDate>| {
            date.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        format!(
            "type={} category={} from={} to={}",
            kind,
            category,
            bound(self.start_date),
            bound(self.end_date)
        )
    }
}

fn parse_filter_date(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ServiceError::Invalid(format!("invalid date `{}` (use YYYY-MM-DD)", value))
    })
}

/// Applies [`TransactionFilter`]s to transaction collections.
pub struct FilterService;

impl FilterService {
    /// Returns the matching subsequence, preserving relative order.
    pub fn apply<'a, I>(items: I, filter: &TransactionFilter) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        items.into_iter().filter(|txn| filter.matches(txn)).collect()
    }

    /// Parses whitespace-separated `field=value` tokens on top of `base`.
    pub fn parse<S: AsRef<str>>(base: TransactionFilter, tokens: &[S]) -> ServiceResult<TransactionFilter> {
        let mut filter = base;
        for token in tokens {
            filter.apply_token(token.as_ref())?;
        }
        Ok(filter)
    }
}
