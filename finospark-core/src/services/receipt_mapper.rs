//! Receipt mapper - turns a parsed receipt into ledger transaction drafts
//!
//! The mapper is pure: the only ambient input is the clock value used for
//! the draft timestamp, and `map_at` lets callers pin it. Missing or odd
//! fields degrade to "absent"; an empty result means nothing billable was
//! found and is for the caller to report.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    LineItem, PurchaseDate, ReceiptData, TransactionDraft, TransactionSource, TransactionType,
    PURCHASE_NOTE_LABEL,
};
use crate::services::purchase_date::{format_purchase_date, parse_purchase_date};

/// Label used when the receipt names no merchant
pub const FALLBACK_CATEGORY: &str = "Receipt import";

/// Descriptions that mark a printed summary row rather than a purchase
pub const SUMMARY_KEYWORDS: [&str; 7] = [
    "total",
    "subtotal",
    "grand total",
    "net total",
    "amount due",
    "amount payable",
    "balance due",
];

/// A summary row matches a declared total when closer than one cent
const SUMMARY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Which receipt figure the draft amount was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    Total,
    Subtotal,
    LineItems,
}

/// Signed amount chosen for a receipt, with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateAmount {
    pub amount: Decimal,
    pub source: AmountSource,
}

/// Rank candidate amounts: declared total, then subtotal, then the sum of
/// line items. Zero never wins; `None` means nothing billable.
pub fn select_aggregate(
    total: Option<Decimal>,
    subtotal: Option<Decimal>,
    detail_sum: Option<Decimal>,
) -> Option<AggregateAmount> {
    [
        (total, AmountSource::Total),
        (subtotal, AmountSource::Subtotal),
        (detail_sum, AmountSource::LineItems),
    ]
    .into_iter()
    .find_map(|(candidate, source)| {
        candidate
            .filter(|amount| !amount.is_zero())
            .map(|amount| AggregateAmount { amount, source })
    })
}

/// Amount a single line contributes: its total, else quantity x unit price,
/// else the unit price alone. Zero values are skipped at every step.
pub fn line_item_amount(item: &LineItem) -> Option<Decimal> {
    if let Some(total) = item.total.filter(|t| !t.is_zero()) {
        return Some(total);
    }
    if let (Some(quantity), Some(unit_price)) = (item.quantity, item.unit_price) {
        if let Some(value) = quantity.checked_mul(unit_price).filter(|v| !v.is_zero()) {
            return Some(value);
        }
    }
    item.unit_price.filter(|p| !p.is_zero())
}

/// Whether a line is a printed "Total" style row repeating a declared total
pub fn is_summary_line(description: &str, amount: Decimal, receipt: &ReceiptData) -> bool {
    let normalized = description.trim().to_lowercase();
    if normalized.is_empty() || !SUMMARY_KEYWORDS.iter().any(|k| normalized.contains(k)) {
        return false;
    }
    let candidate = amount.abs();
    receipt
        .declared_totals()
        .any(|declared| (declared.abs() - candidate).abs() < SUMMARY_TOLERANCE)
}

/// Sum of all non-summary line amounts, `None` when no line carried one
pub fn detail_sum(receipt: &ReceiptData) -> Option<Decimal> {
    let mut sum: Option<Decimal> = None;
    for item in &receipt.line_items {
        let Some(amount) = line_item_amount(item) else {
            continue;
        };
        if is_summary_line(&item.description, amount, receipt) {
            continue;
        }
        let running = sum.unwrap_or(Decimal::ZERO);
        // An overflowing sum is as good as no sum
        sum = Some(running.checked_add(amount)?);
    }
    sum
}

/// Maps receipts to transaction drafts
#[derive(Debug, Clone)]
pub struct ReceiptMapper {
    fallback_category: String,
}

impl Default for ReceiptMapper {
    fn default() -> Self {
        Self::new(FALLBACK_CATEGORY)
    }
}

impl ReceiptMapper {
    pub fn new(fallback_category: impl Into<String>) -> Self {
        let fallback_category = fallback_category.into();
        let fallback_category = match fallback_category.trim() {
            "" => FALLBACK_CATEGORY.to_string(),
            trimmed => trimmed.to_string(),
        };
        Self { fallback_category }
    }

    /// Map a receipt, stamping drafts with the current time
    pub fn map(&self, receipt: &ReceiptData) -> Vec<TransactionDraft> {
        self.map_at(receipt, Utc::now())
    }

    /// Map a receipt with an explicit clock value
    ///
    /// Returns zero or one draft. `now` is both the draft timestamp and the
    /// fallback for an unreadable purchase date.
    pub fn map_at(&self, receipt: &ReceiptData, now: DateTime<Utc>) -> Vec<TransactionDraft> {
        let Some(aggregate) = select_aggregate(receipt.total, receipt.subtotal, detail_sum(receipt)) else {
            return Vec::new();
        };

        let label = present(&receipt.merchant_name)
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback_category.clone());

        let purchased_at = receipt
            .purchase_date
            .as_ref()
            .filter(|date| !matches!(date, PurchaseDate::Text(text) if text.trim().is_empty()))
            .map(|date| parse_purchase_date(date, now));

        vec![TransactionDraft {
            amount: aggregate.amount.abs(),
            transaction_type: TransactionType::from_signed(aggregate.amount),
            category: label.clone(),
            description: format!("{} total", label),
            label,
            timestamp: now,
            note: build_note(receipt, purchased_at.as_ref()),
            tags: build_tags(receipt),
            source: TransactionSource::Ai,
        }]
    }
}

/// Map a receipt with the default fallback category
pub fn map_receipt(receipt: &ReceiptData) -> Vec<TransactionDraft> {
    ReceiptMapper::default().map(receipt)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn build_note(receipt: &ReceiptData, purchased_at: Option<&DateTime<Utc>>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(name) = present(&receipt.merchant_name) {
        parts.push(format!("Merchant: {}", name));
    }
    if let Some(address) = present(&receipt.merchant_address) {
        parts.push(format!("Address: {}", address));
    }
    if let Some(method) = present(&receipt.payment_method) {
        parts.push(format!("Payment: {}", method));
    }
    if let Some(currency) = present(&receipt.currency) {
        parts.push(format!("Currency: {}", currency));
    }
    if let Some(at) = purchased_at {
        parts.push(format!("{}: {}", PURCHASE_NOTE_LABEL, format_purchase_date(at)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn build_tags(receipt: &ReceiptData) -> Vec<String> {
    let mut tags = vec!["receipt".to_string()];
    if let Some(method) = present(&receipt.payment_method) {
        tags.push(method.to_lowercase());
    }
    if let Some(currency) = present(&receipt.currency) {
        tags.push(format!("currency:{}", currency.to_lowercase()));
    }
    if let Some(name) = present(&receipt.merchant_name) {
        // Trimmed name, so the slug has no edge hyphens
        let slug = name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        tags.push(format!("merchant:{}", slug));
    }
    tags.push("receipt-total".to_string());
    TransactionDraft::normalize_tags(tags)
}
