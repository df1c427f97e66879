//! Receipt payload normalization
//!
//! Extractors hand back loosely typed JSON: numbers as strings, blank
//! strings for missing values, dates as text or epoch numbers. This module
//! is the single place that converts such payloads into a strict
//! `ReceiptData`. Every problem is collected and reported at once.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};

use crate::domain::result::{Error, Result};
use crate::domain::{LineItem, PurchaseDate, ReceiptData};

/// Envelope keys accepted around a receipt, in priority order
const ENVELOPE_KEYS: [&str; 2] = ["receipt", "parsed"];

/// Keys that identify a bare receipt object
const RECEIPT_KEYS: [&str; 10] = [
    "merchant_name",
    "merchant_address",
    "purchase_date",
    "subtotal",
    "tax",
    "total",
    "payment_method",
    "currency",
    "line_items",
    "additional_fields",
];

/// Normalize an import payload: `{"receipt": ..}`, `{"parsed": ..}` or a bare receipt
pub fn normalize_payload(payload: &JsonValue) -> Result<ReceiptData> {
    let Some(object) = payload.as_object() else {
        return Err(Error::validation("Receipt payload is required"));
    };

    for key in ENVELOPE_KEYS {
        match object.get(key) {
            None | Some(JsonValue::Null) => continue,
            Some(inner) => return normalize_receipt_at(inner, key),
        }
    }

    if RECEIPT_KEYS.iter().any(|k| object.contains_key(*k)) {
        return normalize_receipt(payload);
    }

    Err(Error::validation("Receipt payload is required"))
}

/// Normalize a receipt object
pub fn normalize_receipt(value: &JsonValue) -> Result<ReceiptData> {
    normalize_receipt_at(value, "receipt")
}

fn normalize_receipt_at(value: &JsonValue, path: &str) -> Result<ReceiptData> {
    let Some(object) = value.as_object() else {
        return Err(Error::validation(format!("{}: expected an object", path)));
    };

    let mut n = Normalizer::default();
    let receipt = ReceiptData {
        merchant_name: n.string(object, "merchant_name", "merchant_name"),
        merchant_address: n.string(object, "merchant_address", "merchant_address"),
        purchase_date: n.purchase_date(object),
        subtotal: n.number(object, "subtotal", "subtotal"),
        tax: n.number(object, "tax", "tax"),
        total: n.number(object, "total", "total"),
        payment_method: n.string(object, "payment_method", "payment_method"),
        currency: n.string(object, "currency", "currency"),
        line_items: n.line_items(object),
        additional_fields: object
            .get("additional_fields")
            .and_then(JsonValue::as_object)
            .cloned(),
    };

    n.finish(receipt)
}

/// Coerce a loose numeric value: numbers pass, numeric strings are parsed,
/// blank strings and null are absent
pub fn coerce_decimal(value: &JsonValue) -> std::result::Result<Option<Decimal>, &'static str> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Number(number) => parse_decimal(&number.to_string())
            .map(Some)
            .ok_or("expected a finite number"),
        JsonValue::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_decimal(trimmed).map(Some).ok_or("expected a number")
        }
        _ => Err("expected a number"),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[derive(Default)]
struct Normalizer {
    issues: Vec<String>,
}

impl Normalizer {
    fn issue(&mut self, path: &str, message: &str) {
        self.issues.push(format!("{}: {}", path, message));
    }

    fn string(&mut self, object: &Map<String, JsonValue>, key: &str, path: &str) -> Option<String> {
        match object.get(key) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(text)) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(_) => {
                self.issue(path, "expected a string");
                None
            }
        }
    }

    fn number(&mut self, object: &Map<String, JsonValue>, key: &str, path: &str) -> Option<Decimal> {
        let value = object.get(key)?;
        match coerce_decimal(value) {
            Ok(number) => number,
            Err(message) => {
                self.issue(path, message);
                None
            }
        }
    }

    fn purchase_date(&mut self, object: &Map<String, JsonValue>) -> Option<PurchaseDate> {
        match object.get("purchase_date") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(text)) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| PurchaseDate::Text(trimmed.to_string()))
            }
            Some(JsonValue::Number(number)) => match number.as_f64() {
                Some(epoch) if epoch.is_finite() => Some(PurchaseDate::Epoch(epoch)),
                _ => {
                    self.issue("purchase_date", "expected a finite number");
                    None
                }
            },
            Some(_) => {
                self.issue("purchase_date", "expected a string or number");
                None
            }
        }
    }

    fn line_items(&mut self, object: &Map<String, JsonValue>) -> Vec<LineItem> {
        let items = match object.get("line_items") {
            None | Some(JsonValue::Null) => return Vec::new(),
            Some(JsonValue::Array(items)) => items,
            Some(_) => {
                self.issue("line_items", "expected an array");
                return Vec::new();
            }
        };

        let mut result = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = format!("line_items[{}]", index);
            let Some(fields) = item.as_object() else {
                self.issue(&path, "expected an object");
                continue;
            };
            result.push(LineItem {
                description: self
                    .string(fields, "description", &format!("{}.description", path))
                    .unwrap_or_default(),
                quantity: self.number(fields, "quantity", &format!("{}.quantity", path)),
                unit_price: self.number(fields, "unit_price", &format!("{}.unit_price", path)),
                total: self.number(fields, "total", &format!("{}.total", path)),
            });
        }
        result
    }

    fn finish(self, receipt: ReceiptData) -> Result<ReceiptData> {
        if self.issues.is_empty() {
            Ok(receipt)
        } else {
            Err(Error::Validation(self.issues.join(", ")))
        }
    }
}
