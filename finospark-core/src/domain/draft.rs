//! Transaction draft domain model

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::receipt::PurchaseDate;

/// Label of the note segment carrying the rendered purchase date
pub const PURCHASE_NOTE_LABEL: &str = "Original purchase";

/// Direction of money movement. Drafts carry sign only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    /// Negative amounts are refunds (credit), everything else is spend
    pub fn from_signed(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            Self::Credit
        } else {
            Self::Debit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

/// Where a draft came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Derived from an AI/OCR receipt extraction
    Ai,
}

/// A proposed ledger entry derived from a receipt, prior to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Always strictly positive
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    pub label: String,
    /// Creation time of the draft, not the purchase date
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub source: TransactionSource,
}

impl TransactionDraft {
    /// Normalize tags: deduplicate, trim whitespace, remove empty
    pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for tag in tags {
            let trimmed = tag.as_ref().trim();
            if !trimmed.is_empty() && seen.insert(trimmed.to_string()) {
                result.push(trimmed.to_string());
            }
        }

        result
    }

    /// Calculate fingerprint hash for re-import protection
    ///
    /// Uses: user, amount, type, label, the note's merchant details and the
    /// receipt's raw purchase date. The rendered purchase date is left out
    /// of the hash since an unreadable date renders as the import time.
    pub fn fingerprint(&self, user_id: &str, purchase_date: Option<&PurchaseDate>) -> String {
        let details = self
            .note
            .as_deref()
            .unwrap_or("")
            .split(" | ")
            .filter(|segment| !segment.starts_with(PURCHASE_NOTE_LABEL))
            .collect::<Vec<_>>()
            .join(" | ");

        let fingerprint_str = format!(
            "{}|{:.2}|{}|{}|{}|{}",
            user_id,
            self.amount,
            self.transaction_type.as_str(),
            self.label.to_lowercase(),
            details,
            purchase_key(purchase_date)
        );

        let mut hasher = Sha256::new();
        hasher.update(fingerprint_str.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}

fn purchase_key(purchase_date: Option<&PurchaseDate>) -> String {
    match purchase_date {
        None => String::new(),
        Some(PurchaseDate::Text(text)) => text.trim().to_string(),
        Some(PurchaseDate::Epoch(value)) => value.to_string(),
        Some(PurchaseDate::At(at)) => at.to_rfc3339(),
    }
}

/// A draft accepted by a store on behalf of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedTransaction {
    pub id: Uuid,
    pub user_id: String,
    pub fingerprint: String,
    pub imported_at: DateTime<Utc>,
    #[serde(flatten)]
    pub draft: TransactionDraft,
}

impl ImportedTransaction {
    pub fn new(draft: TransactionDraft, user_id: impl Into<String>) -> Self {
        Self::from_receipt(draft, user_id, None)
    }

    /// Record for a draft mapped from a receipt with the given raw purchase date
    pub fn from_receipt(
        draft: TransactionDraft,
        user_id: impl Into<String>,
        purchase_date: Option<&PurchaseDate>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            id: Uuid::new_v4(),
            fingerprint: draft.fingerprint(&user_id, purchase_date),
            user_id,
            imported_at: Utc::now(),
            draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> TransactionDraft {
        TransactionDraft {
            amount: Decimal::new(45000, 2),
            transaction_type: TransactionType::Debit,
            category: "Cafe".to_string(),
            description: "Cafe total".to_string(),
            label: "Cafe".to_string(),
            timestamp: Utc::now(),
            note: Some("Merchant: Cafe".to_string()),
            tags: vec!["receipt".to_string()],
            source: TransactionSource::Ai,
        }
    }

    #[test]
    fn test_type_from_signed() {
        assert_eq!(TransactionType::from_signed(Decimal::new(-1, 0)), TransactionType::Credit);
        assert_eq!(TransactionType::from_signed(Decimal::ZERO), TransactionType::Debit);
        assert_eq!(TransactionType::from_signed(Decimal::new(5, 0)), TransactionType::Debit);
    }

    #[test]
    fn test_tag_normalization() {
        let normalized = TransactionDraft::normalize_tags(["receipt", " cash ", "receipt", ""]);
        assert_eq!(normalized, vec!["receipt", "cash"]);
    }

    #[test]
    fn test_fingerprint_ignores_timestamp() {
        let first = sample_draft();
        let mut second = sample_draft();
        second.timestamp = first.timestamp + chrono::Duration::hours(3);

        assert_eq!(first.fingerprint("u1", None), second.fingerprint("u1", None));
        assert_eq!(first.fingerprint("u1", None).len(), 16);
        assert_ne!(first.fingerprint("u1", None), first.fingerprint("u2", None));
    }

    #[test]
    fn test_fingerprint_uses_raw_purchase_date() {
        let mut first = sample_draft();
        first.note = Some("Merchant: Cafe | Original purchase: 18 Oct 2026, 9:00 am".to_string());
        let mut second = sample_draft();
        second.note = Some("Merchant: Cafe | Original purchase: 18 Oct 2026, 9:05 am".to_string());

        let garbled = PurchaseDate::Text("sometime last week".to_string());
        assert_eq!(
            first.fingerprint("u1", Some(&garbled)),
            second.fingerprint("u1", Some(&garbled))
        );

        let other = PurchaseDate::Text("15/11/2023".to_string());
        assert_ne!(
            first.fingerprint("u1", Some(&garbled)),
            first.fingerprint("u1", Some(&other))
        );

        // Merchant details still separate receipts
        let mut elsewhere = first.clone();
        elsewhere.note = Some("Merchant: Cafe | Address: MG Road".to_string());
        assert_ne!(first.fingerprint("u1", None), elsewhere.fingerprint("u1", None));
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_value(sample_draft()).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["source"], "ai");
    }

    #[test]
    fn test_imported_transaction_flattens_draft() {
        let imported = ImportedTransaction::new(sample_draft(), "local");
        let json = serde_json::to_value(&imported).unwrap();
        assert_eq!(json["user_id"], "local");
        assert_eq!(json["label"], "Cafe");

        let back: ImportedTransaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, imported);
    }
}
