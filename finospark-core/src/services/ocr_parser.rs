//! Text receipt parser
//!
//! Best-effort extraction of receipt fields from plain OCR text, used when
//! no structured extraction is available. Pattern matching only; anything
//! not found is left absent for the mapper to cope with.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{AnalyzeResponse, LineItem, PurchaseDate, ReceiptData};

/// Only the first few lines are considered for the merchant name
const MERCHANT_SCAN_LINES: usize = 5;

/// Amount with an optional currency marker, e.g. `$1,299.00`, `Rs. 450`, `₹80`
const AMOUNT: &str = r"(?:\$|₹|rs\.?|inr)?\s*([\d,]+\.?\d*)";

static LEADING_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[/-]\d+").expect("leading date pattern"));

static DATE_RES: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(\d{4}[/-]\d{1,2}[/-]\d{1,2})").expect("year-first date pattern"),
        Regex::new(r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").expect("day-first date pattern"),
    ]
});

static TOTAL_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(&format!(r"\btotal[:\s]*{}", AMOUNT)).expect("total pattern"),
        Regex::new(&format!(r"\bamount[:\s]*{}", AMOUNT)).expect("amount pattern"),
        Regex::new(&format!(r"grand\s+total[:\s]*{}", AMOUNT)).expect("grand total pattern"),
    ]
});

static SUBTOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"sub[\s-]?total[:\s]*{}", AMOUNT)).expect("subtotal pattern")
});

static TAX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\btax[:\s]*{}", AMOUNT)).expect("tax pattern"));

static TRAILING_PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?([\d,]+\.?\d{2})\s*$").expect("trailing price pattern"));

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+\s+[\w\s]+(?:street|st|avenue|ave|road|rd|boulevard|blvd|drive|dr|lane|ln)[\w\s,]*\d{5})",
    )
    .expect("address pattern")
});

/// Payment keywords checked in order; the first hit wins
const PAYMENT_KEYWORDS: [(&str, &str); 7] = [
    ("cash", "Cash"),
    ("credit", "Credit Card"),
    ("debit", "Debit Card"),
    ("visa", "Visa"),
    ("mastercard", "Mastercard"),
    ("amex", "American Express"),
    ("paypal", "PayPal"),
];

/// Knobs for the text parser
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Currency stamped on every parsed receipt
    pub default_currency: Option<String>,
    pub max_line_items: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            default_currency: Some("RS".to_string()),
            max_line_items: 20,
        }
    }
}

/// Extract receipt fields from OCR text
pub fn parse_receipt_text(text: &str, options: &ParserOptions) -> ReceiptData {
    if text.trim().is_empty() {
        return ReceiptData::default();
    }

    let lowered = text.to_lowercase();

    ReceiptData {
        merchant_name: find_merchant(text),
        merchant_address: ADDRESS_RE
            .captures(text)
            .map(|caps| caps[1].trim().to_string()),
        purchase_date: DATE_RES
            .iter()
            .find_map(|re| re.captures(text))
            .map(|caps| PurchaseDate::Text(caps[1].to_string())),
        subtotal: capture_amount(&SUBTOTAL_RE, &lowered),
        tax: capture_amount(&TAX_RE, &lowered),
        total: TOTAL_RES
            .iter()
            .find_map(|re| capture_amount(re, &lowered)),
        payment_method: PAYMENT_KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, method)| method.to_string()),
        currency: options.default_currency.clone(),
        line_items: find_line_items(text, options.max_line_items),
        additional_fields: None,
    }
}

/// Run the text parser and report what it could not find
pub fn analyze_text(text: &str, options: &ParserOptions) -> AnalyzeResponse {
    if text.trim().is_empty() {
        return AnalyzeResponse {
            warnings: vec!["No text to analyze".to_string()],
            ..Default::default()
        };
    }

    let parsed = parse_receipt_text(text, options);
    let mut warnings = Vec::new();
    if parsed.merchant_name.is_none() {
        warnings.push("Merchant name not detected".to_string());
    }
    if parsed.total.is_none() {
        if parsed.subtotal.is_none() && parsed.line_items.is_empty() {
            warnings.push("No monetary values detected".to_string());
        } else {
            warnings.push("Total not detected; amount will come from subtotal or line items".to_string());
        }
    }

    AnalyzeResponse {
        parsed: Some(parsed),
        raw_text: None,
        ocr_text: Some(text.to_string()),
        warnings,
    }
}

fn find_merchant(text: &str) -> Option<String> {
    text.lines()
        .take(MERCHANT_SCAN_LINES)
        .map(str::trim)
        .find(|line| line.chars().count() > 2 && !LEADING_DATE_RE.is_match(line))
        .map(str::to_string)
}

/// First match of `re` in `haystack`, parsed as an amount; `None` when the
/// pattern is missing or its capture is not a number
fn capture_amount(re: &Regex, haystack: &str) -> Option<Decimal> {
    let caps = re.captures(haystack)?;
    parse_amount(&caps[1])
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

fn find_line_items(text: &str, limit: usize) -> Vec<LineItem> {
    let mut items = Vec::new();
    for line in text.lines().map(str::trim) {
        if items.len() >= limit {
            break;
        }
        if line.chars().count() < 3 {
            continue;
        }
        let Some(caps) = TRAILING_PRICE_RE.captures(line) else {
            continue;
        };
        let Some(price) = parse_amount(&caps[1]) else {
            continue;
        };
        let description = TRAILING_PRICE_RE.replace(line, "");
        let description = description.trim();
        if description.is_empty() || price <= Decimal::ZERO {
            continue;
        }
        items.push(LineItem::with_total(description, price));
    }
    items
}
