#![doc(test(attr(deny(warnings))))]

//! Finance Tracker records income and expense transactions against
//! user-defined categories, summarizes them by month and category, filters
//! the history, and exports it as CSV. State lives in a local JSON key-value
//! store.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Finance Tracker tracing initialized.");
    });
}
