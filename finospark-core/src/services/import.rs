//! Import service - receipt payload to stored transaction drafts
//!
//! Pipeline: identity check, payload normalization, mapping, then a single
//! store call that skips already stored fingerprints and writes the rest.
//! Preview checks fingerprints without writing.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{ImportedTransaction, ReceiptData};
use crate::ports::DraftStore;
use crate::services::normalize::normalize_payload;
use crate::services::receipt_mapper::ReceiptMapper;

/// Outcome of one import call
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub batch_id: Uuid,
    pub preview: bool,
    /// Drafts written (or that would be written, in preview)
    pub imported: Vec<ImportedTransaction>,
    /// Drafts skipped because the same fingerprint is already stored
    pub duplicates: usize,
}

/// Service for importing receipts as transaction drafts
pub struct ImportService {
    store: Arc<dyn DraftStore>,
    mapper: ReceiptMapper,
}

impl ImportService {
    pub fn new(store: Arc<dyn DraftStore>, mapper: ReceiptMapper) -> Self {
        Self { store, mapper }
    }

    /// Import a loosely typed receipt payload for `user_id`
    pub fn import(
        &self,
        payload: &JsonValue,
        user_id: Option<&str>,
        preview: bool,
    ) -> Result<ImportResult> {
        let user_id = require_identity(user_id)?;
        let receipt = normalize_payload(payload)?;
        self.import_receipt(&receipt, user_id, preview)
    }

    /// Import an already normalized receipt
    pub fn import_receipt(
        &self,
        receipt: &ReceiptData,
        user_id: &str,
        preview: bool,
    ) -> Result<ImportResult> {
        let user_id = require_identity(Some(user_id))?;

        let drafts = self.mapper.map(receipt);
        if drafts.is_empty() {
            return Err(Error::NoMonetaryValues);
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(drafts.len());
        let mut duplicates = 0;
        for draft in drafts {
            let record =
                ImportedTransaction::from_receipt(draft, user_id, receipt.purchase_date.as_ref());
            if seen.insert(record.fingerprint.clone()) {
                candidates.push(record);
            } else {
                duplicates += 1;
            }
        }

        let imported = if preview {
            let mut fresh = Vec::with_capacity(candidates.len());
            for record in candidates {
                if self.store.contains_fingerprint(user_id, &record.fingerprint)? {
                    duplicates += 1;
                } else {
                    fresh.push(record);
                }
            }
            fresh
        } else {
            let (stored, skipped) = self.store.insert_new(&candidates)?;
            duplicates += skipped;
            stored
        };

        Ok(ImportResult {
            batch_id: Uuid::new_v4(),
            preview,
            imported,
            duplicates,
        })
    }

    /// Stored drafts, optionally restricted to one user
    pub fn list(&self, user_id: Option<&str>) -> Result<Vec<ImportedTransaction>> {
        self.store.list(user_id)
    }
}

fn require_identity(user_id: Option<&str>) -> Result<&str> {
    match user_id.map(str::trim) {
        Some(user) if !user.is_empty() => Ok(user),
        _ => Err(Error::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::adapters::MemoryDraftStore;
    use crate::domain::TransactionType;

    fn service() -> (Arc<MemoryDraftStore>, ImportService) {
        let store = Arc::new(MemoryDraftStore::new());
        let service = ImportService::new(store.clone(), ReceiptMapper::default());
        (store, service)
    }

    fn cafe_payload() -> JsonValue {
        json!({
            "receipt": {
                "merchant_name": "Blue Tokai",
                "total": "450",
                "payment_method": "UPI",
                "currency": "INR",
                "line_items": [
                    {"description": "Coffee", "total": 400},
                    {"description": "Total", "total": 450}
                ]
            }
        })
    }

    #[test]
    fn test_import_stores_draft() {
        let (store, service) = service();

        let result = service.import(&cafe_payload(), Some("alice"), false).unwrap();

        assert!(!result.preview);
        assert_eq!(result.duplicates, 0);
        assert_eq!(result.imported.len(), 1);
        let record = &result.imported[0];
        assert_eq!(record.user_id, "alice");
        assert_eq!(record.draft.amount, Decimal::new(450, 0));
        assert_eq!(record.draft.transaction_type, TransactionType::Debit);
        assert_eq!(record.draft.label, "Blue Tokai");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_preview_does_not_write() {
        let (store, service) = service();
        let result = service.import(&cafe_payload(), Some("alice"), true).unwrap();
        assert!(result.preview);
        assert_eq!(result.imported.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_identity_is_unauthorized() {
        let (store, service) = service();
        for user in [None, Some(""), Some("   ")] {
            let err = service.import(&cafe_payload(), user, false).unwrap_err();
            assert!(matches!(err, Error::Unauthorized));
            assert_eq!(err.status_code(), 401);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_payload_is_validation_error() {
        let (_, service) = service();
        let err = service
            .import(&json!({"receipt": {"total": "lots"}}), Some("alice"), false)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("total: expected a number"));
    }

    #[test]
    fn test_no_monetary_values() {
        let (store, service) = service();
        let err = service
            .import(&json!({"receipt": {"merchant_name": "Cafe", "total": 0}}), Some("alice"), false)
            .unwrap_err();
        assert!(matches!(err, Error::NoMonetaryValues));
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_string(), "No monetary values detected in receipt");
        assert!(store.is_empty());
    }

    #[test]
    fn test_reimport_is_duplicate() {
        let (store, service) = service();
        service.import(&cafe_payload(), Some("alice"), false).unwrap();

        let again = service.import(&cafe_payload(), Some("alice"), false).unwrap();
        assert!(again.imported.is_empty());
        assert_eq!(again.duplicates, 1);
        assert_eq!(store.len(), 1);

        // Another user importing the same receipt is not a duplicate
        let other = service.import(&cafe_payload(), Some("bob"), false).unwrap();
        assert_eq!(other.imported.len(), 1);
        assert_eq!(service.list(Some("bob")).unwrap().len(), 1);
        assert_eq!(service.list(None).unwrap().len(), 2);
    }

    #[test]
    fn test_reimport_with_unparseable_date_is_duplicate() {
        let (store, service) = service();
        let payload = json!({
            "receipt": {"merchant_name": "Cafe", "total": 450, "purchase_date": "sometime last week"}
        });

        let first = service.import(&payload, Some("alice"), false).unwrap();
        assert_eq!(first.imported.len(), 1);

        let again = service.import(&payload, Some("alice"), false).unwrap();
        assert!(again.imported.is_empty());
        assert_eq!(again.duplicates, 1);
        assert_eq!(store.len(), 1);

        let preview = service.import(&payload, Some("alice"), true).unwrap();
        assert!(preview.imported.is_empty());
        assert_eq!(preview.duplicates, 1);
    }
}
