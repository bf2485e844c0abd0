pub mod category_service;
pub mod export_service;
pub mod filter_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use export_service::{ExportService, CSV_HEADER, CSV_MIME_TYPE};
pub use filter_service::{CategoryFilter, FilterService, KindFilter, TransactionFilter};
pub use summary_service::{CategoryTotal, MonthlyTotals, Summary, SummaryService};
pub use transaction_service::TransactionService;

use crate::core::errors::TrackerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("{0}")]
    Invalid(String),
}
