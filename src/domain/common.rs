//! Entry kind shared by transactions and categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Direction of a money movement. Shared by transactions and categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    #[default]
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn sign(self) -> char {
        match self {
            EntryKind::Income => '+',
            EntryKind::Expense => '-',
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry type `{0}` (expected `income` or `expense`)")]
pub struct ParseEntryKindError(pub String);

impl FromStr for EntryKind {
    type Err = ParseEntryKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(EntryKind::Income),
            "expense" | "out" => Ok(EntryKind::Expense),
            other => Err(ParseEntryKindError(other.to_string())),
        }
    }
}
