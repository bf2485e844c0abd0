#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use finance_tracker::{
    config::ConfigManager,
    core::TrackerManager,
    domain::{EntryKind, NewTransaction},
    storage::JsonFileStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh application directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated manager and config manager sharing one base directory.
pub fn setup_test_env() -> (TrackerManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let manager = open_manager(&base);
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}

/// Opens (or reopens) the JSON-backed manager under `base`.
pub fn open_manager(base: &Path) -> TrackerManager {
    let store = JsonFileStore::new(Some(base.to_path_buf())).expect("create json store");
    TrackerManager::open(Box::new(store)).expect("open tracker")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Two months of activity against the seed categories.
pub fn sample_drafts() -> Vec<NewTransaction> {
    vec![
        NewTransaction::new(EntryKind::Income, 3000.0, date(2024, 1, 31), "1")
            .with_notes("January salary"),
        NewTransaction::new(EntryKind::Expense, 120.5, date(2024, 1, 12), "3"),
        NewTransaction::new(EntryKind::Expense, 45.0, date(2024, 2, 3), "4")
            .with_notes("Metro card"),
        NewTransaction::new(EntryKind::Income, 400.0, date(2024, 2, 20), "2"),
        NewTransaction::new(EntryKind::Expense, 60.0, date(2024, 2, 25), "5"),
    ]
}

/// Manager under a fresh base directory holding [`sample_drafts`].
pub fn seeded_manager() -> (TrackerManager, PathBuf) {
    let (mut manager, _, base) = setup_test_env();
    for draft in sample_drafts() {
        manager
            .add_transaction(draft)
            .expect("add sample transaction");
    }
    (manager, base)
}
