//! Concurrent draft store access
//!
//! Several store instances append to the same drafts.jsonl at once, the way
//! overlapping CLI invocations would. The file lock must keep every line
//! whole, and a receipt imported by several callers at once is stored once.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;

use finospark_core::adapters::JsonlDraftStore;
use finospark_core::domain::TransactionSource;
use finospark_core::ports::DraftStore;
use finospark_core::services::import::ImportService;
use finospark_core::services::receipt_mapper::ReceiptMapper;
use finospark_core::{ImportedTransaction, TransactionDraft, TransactionType};

const THREAD_COUNT: usize = 6;
const ITERATIONS_PER_THREAD: usize = 10;

fn draft(thread_id: usize, iteration: usize) -> TransactionDraft {
    let label = format!("Shop {}", thread_id);
    TransactionDraft {
        amount: Decimal::new((thread_id * 1000 + iteration) as i64, 2),
        transaction_type: TransactionType::Debit,
        category: label.clone(),
        description: format!("{} total", label),
        label,
        timestamp: Utc::now(),
        note: Some(format!("Merchant: Shop {} | Currency: INR", thread_id)),
        tags: vec!["receipt".to_string(), "receipt-total".to_string()],
        source: TransactionSource::Ai,
    }
}

#[test]
fn test_concurrent_store_instances_appending() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let barrier = Arc::clone(&barrier);
            let data_dir = Arc::clone(&data_dir);
            thread::spawn(move || {
                let store = JsonlDraftStore::in_dir(&data_dir);
                barrier.wait();
                for iteration in 0..ITERATIONS_PER_THREAD {
                    let record = ImportedTransaction::new(draft(thread_id, iteration), "local");
                    store.bulk_insert(&[record]).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let store = JsonlDraftStore::in_dir(&data_dir);
    let records = store.list(None).unwrap();
    assert_eq!(records.len(), THREAD_COUNT * ITERATIONS_PER_THREAD);

    let mut fingerprints: Vec<_> = records.iter().map(|r| r.fingerprint.clone()).collect();
    fingerprints.sort();
    fingerprints.dedup();
    assert_eq!(fingerprints.len(), records.len());
}

#[test]
fn test_readers_alongside_writer() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    let writer_dir = data_dir.clone();
    let writer = thread::spawn(move || {
        let store = JsonlDraftStore::in_dir(&writer_dir);
        for iteration in 0..ITERATIONS_PER_THREAD {
            let batch: Vec<_> = (0..5)
                .map(|i| ImportedTransaction::new(draft(i, iteration), "local"))
                .collect();
            store.bulk_insert(&batch).unwrap();
        }
    });

    let reader = JsonlDraftStore::in_dir(&data_dir);
    for _ in 0..20 {
        // Every observed state must parse and hold whole batches
        let count = reader.list(None).unwrap().len();
        assert_eq!(count % 5, 0);
    }

    writer.join().unwrap();
    assert_eq!(reader.list(None).unwrap().len(), ITERATIONS_PER_THREAD * 5);
}

#[test]
fn test_simultaneous_reimport_is_stored_once() {
    const IMPORTERS: usize = 8;
    const ROUNDS: usize = 30;

    for round in 0..ROUNDS {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = Arc::new(temp_dir.path().to_path_buf());
        let barrier = Arc::new(Barrier::new(IMPORTERS));

        let handles: Vec<_> = (0..IMPORTERS)
            .map(|_| {
                let data_dir = Arc::clone(&data_dir);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let store = Arc::new(JsonlDraftStore::in_dir(&data_dir));
                    let service = ImportService::new(store, ReceiptMapper::default());
                    let payload = json!({"receipt": {"merchant_name": "Cafe", "total": 450}});
                    barrier.wait();
                    service.import(&payload, Some("alice"), false).unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let imported: usize = results.iter().map(|r| r.imported.len()).sum();
        let duplicates: usize = results.iter().map(|r| r.duplicates).sum();

        let stored = JsonlDraftStore::in_dir(&data_dir).list(Some("alice")).unwrap();
        assert_eq!(stored.len(), 1, "round {} stored {} drafts", round, stored.len());
        assert_eq!(imported, 1, "round {}", round);
        assert_eq!(duplicates, IMPORTERS - 1, "round {}", round);
    }
}
