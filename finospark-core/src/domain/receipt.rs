//! Receipt domain model
//!
//! Strict, already-normalized view of an extracted receipt. Loose input
//! (numeric strings, mixed date shapes) is converted into these types by
//! `services::normalize` before any business logic runs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Purchase date in whichever raw form the extractor produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PurchaseDate {
    /// Unix seconds or milliseconds, disambiguated by magnitude
    Epoch(f64),
    /// An already-constructed point in time
    At(DateTime<Utc>),
    /// Free text: ISO, digit-only timestamps, D/M/Y and friends
    Text(String),
}

impl From<&str> for PurchaseDate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for PurchaseDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self::At(value)
    }
}

/// One purchased entry on a receipt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl LineItem {
    /// Line item with just a description and a line total
    pub fn with_total(description: impl Into<String>, total: Decimal) -> Self {
        Self {
            description: description.into(),
            total: Some(total),
            ..Default::default()
        }
    }

    /// Line item priced per unit
    pub fn priced(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            total: None,
        }
    }
}

/// Structured extraction of a purchase document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<PurchaseDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Extractor-specific extras, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<Map<String, JsonValue>>,
}

impl ReceiptData {
    /// Declared totals that can identify a printed summary row
    pub fn declared_totals(&self) -> impl Iterator<Item = Decimal> + '_ {
        [self.total, self.subtotal].into_iter().flatten()
    }
}

/// Output of the receipt analyzer: parsed fields plus diagnostics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub parsed: Option<ReceiptData>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}
