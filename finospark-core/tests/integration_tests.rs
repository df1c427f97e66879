//! End-to-end flows through the public API

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;

use finospark_core::adapters::JsonlDraftStore;
use finospark_core::config::Config;
use finospark_core::services::receipt_mapper::ReceiptMapper;
use finospark_core::services::{analyze_text, normalize_payload, plan, ImportService, ParserOptions};
use finospark_core::{Error, FinosparkContext, ImportResult, OperationResult, TransactionType};

const OCR_TEXT: &str = "\
Corner Deli
2024-03-09
Sandwich 240.00
Lemonade 60.00
Subtotal 300.00
Total 318.00
Paid in cash
";

#[test]
fn test_context_imports_into_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = FinosparkContext::new(temp_dir.path()).unwrap();
    assert_eq!(ctx.user_id(), Some("local"));

    let payload = json!({
        "parsed": {
            "merchant_name": "Blue Tokai",
            "total": 450,
            "purchase_date": "15/11/2023",
            "line_items": [
                {"description": "Coffee", "total": 400},
                {"description": "Total", "total": 450}
            ]
        }
    });

    let result = ctx.import_service.import(&payload, ctx.user_id(), false).unwrap();
    assert_eq!(result.imported.len(), 1);
    assert!(temp_dir.path().join("drafts.jsonl").exists());

    // A fresh context over the same directory sees the draft and dedupes
    let reopened = FinosparkContext::new(temp_dir.path()).unwrap();
    let again = reopened.import_service.import(&payload, reopened.user_id(), false).unwrap();
    assert_eq!(again.duplicates, 1);

    let stored = reopened.import_service.list(Some("local")).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].draft.amount, Decimal::new(450, 0));
    assert!(stored[0]
        .draft
        .note
        .as_deref()
        .unwrap()
        .contains("Original purchase: 15 Nov 2023"));
}

#[test]
fn test_configured_fallback_category() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        fallback_category: "Groceries".to_string(),
        ..Config::default()
    };
    config.save(temp_dir.path()).unwrap();

    let ctx = FinosparkContext::new(temp_dir.path()).unwrap();
    let result = ctx
        .import_service
        .import(&json!({"subtotal": "100"}), Some("local"), true)
        .unwrap();
    assert_eq!(result.imported[0].draft.category, "Groceries");
    assert_eq!(result.imported[0].draft.description, "Groceries total");
}

#[test]
fn test_rejections_carry_status_codes() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonlDraftStore::in_dir(temp_dir.path()));
    let service = ImportService::new(store, ReceiptMapper::default());

    let empty = service.import(&json!({"receipt": {"line_items": []}}), Some("local"), false);
    let report: OperationResult<ImportResult> = empty.into();
    assert!(!report.success);
    assert_eq!(report.status, Some(422));

    let unauthorized = service.import(&json!({"total": 10}), None, false).unwrap_err();
    assert!(matches!(unauthorized, Error::Unauthorized));

    let invalid = service.import(&json!("nope"), Some("local"), false).unwrap_err();
    assert_eq!(invalid.status_code(), 400);

    assert!(!temp_dir.path().join("drafts.jsonl").exists());
}

#[test]
fn test_analyze_then_import() {
    let response = analyze_text(OCR_TEXT, &ParserOptions::default());
    assert!(response.warnings.is_empty());

    let parsed = serde_json::to_value(&response).unwrap();
    let receipt = normalize_payload(&parsed).unwrap();
    assert_eq!(receipt.total, Some(Decimal::new(318, 0)));

    let mapper = ReceiptMapper::default();
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
    let drafts = mapper.map_at(&receipt, now);
    assert_eq!(drafts.len(), 1);

    let draft = &drafts[0];
    assert_eq!(draft.amount, Decimal::new(318, 0));
    assert_eq!(draft.transaction_type, TransactionType::Debit);
    assert_eq!(draft.label, "Corner Deli");
    assert_eq!(draft.timestamp, now);
    assert!(draft.tags.contains(&"cash".to_string()));
    assert!(draft.tags.contains(&"currency:rs".to_string()));
    assert!(draft.tags.contains(&"merchant:corner-deli".to_string()));
}

#[test]
fn test_refund_receipt_is_credit() {
    let store = Arc::new(finospark_core::adapters::MemoryDraftStore::new());
    let service = ImportService::new(store, ReceiptMapper::default());

    let result = service
        .import(&json!({"merchant_name": "Store", "total": "-25.50"}), Some("local"), false)
        .unwrap();
    let draft = &result.imported[0].draft;
    assert_eq!(draft.amount, Decimal::new(2550, 2));
    assert_eq!(draft.transaction_type, TransactionType::Credit);
}

#[test]
fn test_goal_plan_shapes() {
    let result = plan(750_000.0, 3.0, 11.0);
    assert_eq!(result.months, 36);
    assert_eq!(result.monthly_investment, 17_518);
    assert_eq!(result.total_invested, 630_664);
    assert_eq!(result.projected_corpus, 750_000);
    assert_eq!(result.growth_gain, 119_336);
}
