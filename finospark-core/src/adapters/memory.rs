//! In-memory draft store

use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::ImportedTransaction;
use crate::ports::DraftStore;

/// Draft store that keeps everything in a Vec
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    records: Mutex<Vec<ImportedTransaction>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DraftStore for MemoryDraftStore {
    fn bulk_insert(&self, records: &[ImportedTransaction]) -> Result<Vec<ImportedTransaction>> {
        let mut stored = self
            .records
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))?;
        stored.extend_from_slice(records);
        Ok(records.to_vec())
    }

    fn insert_new(&self, records: &[ImportedTransaction]) -> Result<(Vec<ImportedTransaction>, usize)> {
        let mut stored = self
            .records
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))?;

        let mut fresh = Vec::new();
        let mut skipped = 0;
        for record in records {
            let known = stored
                .iter()
                .any(|r| r.user_id == record.user_id && r.fingerprint == record.fingerprint);
            if known {
                skipped += 1;
            } else {
                stored.push(record.clone());
                fresh.push(record.clone());
            }
        }
        Ok((fresh, skipped))
    }

    fn contains_fingerprint(&self, user_id: &str, fingerprint: &str) -> Result<bool> {
        let stored = self
            .records
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))?;
        Ok(stored
            .iter()
            .any(|r| r.user_id == user_id && r.fingerprint == fingerprint))
    }

    fn list(&self, user_id: Option<&str>) -> Result<Vec<ImportedTransaction>> {
        let stored = self
            .records
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))?;
        Ok(stored
            .iter()
            .filter(|r| user_id.map_or(true, |u| r.user_id == u))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::{TransactionDraft, TransactionSource, TransactionType};

    fn record(user: &str, label: &str) -> ImportedTransaction {
        ImportedTransaction::new(
            TransactionDraft {
                amount: Decimal::new(450, 0),
                transaction_type: TransactionType::Debit,
                category: label.to_string(),
                description: format!("{} total", label),
                label: label.to_string(),
                timestamp: Utc::now(),
                note: None,
                tags: vec!["receipt".to_string()],
                source: TransactionSource::Ai,
            },
            user,
        )
    }

    #[test]
    fn test_insert_new_skips_known_fingerprints() {
        let store = MemoryDraftStore::new();
        let cafe = record("alice", "Cafe");

        let (stored, skipped) = store.insert_new(&[cafe.clone()]).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(skipped, 0);

        let (stored, skipped) = store
            .insert_new(&[record("alice", "Cafe"), record("alice", "Deli"), record("bob", "Cafe")])
            .unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(stored.len(), 2);
        assert_eq!(store.len(), 3);
        assert!(store.contains_fingerprint("alice", &cafe.fingerprint).unwrap());
    }
}
