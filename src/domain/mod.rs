pub mod category;
pub mod common;
pub mod tracker;
pub mod transaction;

pub use category::{default_categories, Category, UNKNOWN_CATEGORY_LABEL};
pub use common::{EntryKind, ParseEntryKindError};
pub use tracker::Tracker;
pub use transaction::{NewTransaction, Transaction};
