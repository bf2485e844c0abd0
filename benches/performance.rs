use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finance_tracker::core::services::{ExportService, FilterService, SummaryService, TransactionFilter};
use finance_tracker::domain::{default_categories, EntryKind, Transaction};
use finance_tracker::storage::{load_collection, save_collection, JsonFileStore, TRANSACTIONS_KEY};
use tempfile::tempdir;

fn build_history(txn_count: usize) -> Vec<Transaction> {
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..txn_count)
        .map(|idx| {
            let kind = if idx % 4 == 0 {
                EntryKind::Income
            } else {
                EntryKind::Expense
            };
            let category = match kind {
                EntryKind::Income => ["1", "2"][idx % 2],
                EntryKind::Expense => ["3", "4", "5"][idx % 3],
            };
            let notes = (idx % 5 == 0).then(|| format!("note \"{}\"", idx));
            Transaction::new(
                kind,
                10.0 + (idx % 250) as f64,
                start_date + Duration::days((idx % 730) as i64),
                category,
                notes,
            )
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let history = build_history(black_box(10_000));

    c.bench_function("summarize_10k", |b| {
        b.iter(|| black_box(SummaryService::summarize(&history)))
    });

    let filter = TransactionFilter::new()
        .with_kind(EntryKind::Expense)
        .with_category("3")
        .with_range(NaiveDate::from_ymd_opt(2024, 3, 1), NaiveDate::from_ymd_opt(2024, 9, 30));
    c.bench_function("filter_10k", |b| {
        b.iter(|| black_box(FilterService::apply(&history, &filter)))
    });
}

fn bench_export_and_io(c: &mut Criterion) {
    let history = build_history(black_box(10_000));
    let categories = default_categories();

    c.bench_function("export_csv_10k", |b| {
        b.iter(|| black_box(ExportService::to_csv(&history, &categories)))
    });

    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::at(dir.path().to_path_buf()).expect("store");

    c.bench_function("save_transactions_10k", |b| {
        b.iter(|| save_collection(&store, TRANSACTIONS_KEY, &history).expect("save"))
    });

    save_collection(&store, TRANSACTIONS_KEY, &history).expect("seed");
    c.bench_function("load_transactions_10k", |b| {
        b.iter(|| {
            let loaded: Vec<Transaction> =
                load_collection(&store, TRANSACTIONS_KEY, Vec::new).expect("load");
            black_box(loaded)
        })
    });
}

criterion_group!(benches, bench_aggregation, bench_export_and_io);
criterion_main!(benches);
