//! Analyze command - extract receipt fields from OCR text

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_command, log_event, read_input};
use crate::output;
use finospark_core::services::logging::events;
use finospark_core::services::{analyze_text, format_purchase_date, parse_purchase_date};
use finospark_core::{LogEvent, PurchaseDate};

pub fn run(file: Option<&Path>, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "analyze");

    let text = read_input(file, "receipt text")?;
    let ctx = get_context()?;
    let response = analyze_text(&text, &ctx.config.parser_options());
    log_event(&logger, LogEvent::new(events::RECEIPT_ANALYZED).with_command("analyze"));

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let Some(receipt) = &response.parsed {
        println!("{}", "Parsed Receipt".bold());
        println!();

        let mut table = output::create_table();
        let purchase_date = receipt.purchase_date.as_ref().map(|date| match date {
            PurchaseDate::Text(text) => text.clone(),
            other => format_purchase_date(&parse_purchase_date(other, chrono::Utc::now())),
        });
        let fields = [
            ("Merchant", receipt.merchant_name.clone()),
            ("Address", receipt.merchant_address.clone()),
            ("Date", purchase_date),
            ("Subtotal", receipt.subtotal.map(|d| d.to_string())),
            ("Tax", receipt.tax.map(|d| d.to_string())),
            ("Total", receipt.total.map(|d| d.to_string())),
            ("Payment", receipt.payment_method.clone()),
            ("Currency", receipt.currency.clone()),
        ];
        for (name, value) in fields {
            table.add_row(vec![name.to_string(), value.unwrap_or_else(|| "-".to_string())]);
        }
        println!("{}", table);

        if !receipt.line_items.is_empty() {
            println!();
            println!("{}", "Line Items".bold());
            let mut items = output::create_table();
            items.set_header(vec!["Description", "Amount"]);
            for item in &receipt.line_items {
                items.add_row(vec![
                    item.description.clone(),
                    item.total.map(|d| d.to_string()).unwrap_or_default(),
                ]);
            }
            println!("{}", items);
        }
    }

    if !response.warnings.is_empty() {
        println!();
        for warning in &response.warnings {
            output::warning(&format!("! {}", warning));
        }
    }

    Ok(())
}
