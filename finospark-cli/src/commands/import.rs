//! Import command - turn a receipt payload into stored transaction drafts

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::{get_context, get_logger, log_command, log_error, log_event, read_input};
use crate::output;
use finospark_core::services::logging::events;
use finospark_core::{ImportResult, LogEvent, OperationResult};

pub fn run(file: Option<&Path>, preview: bool, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "import");

    let content = read_input(file, "receipt payload")?;
    let payload: serde_json::Value =
        serde_json::from_str(&content).context("Receipt payload is not valid JSON")?;

    let ctx = get_context()?;
    let outcome = ctx.import_service.import(&payload, ctx.user_id(), preview);

    match &outcome {
        Ok(_) => log_event(
            &logger,
            LogEvent::new(events::RECEIPT_IMPORTED).with_command("import"),
        ),
        Err(e) => log_error(
            &logger,
            events::RECEIPT_REJECTED,
            &e.to_string(),
            Some(&format!("status {}", e.status_code())),
        ),
    }

    if json {
        let failed = outcome.is_err();
        let report: OperationResult<ImportResult> = outcome.into();
        println!("{}", serde_json::to_string_pretty(&report)?);
        if failed {
            anyhow::bail!("Import failed");
        }
        return Ok(());
    }

    let result = outcome?;
    print_result(&result);
    Ok(())
}

fn print_result(result: &ImportResult) {
    if result.imported.is_empty() {
        output::warning(&format!(
            "Nothing new to import ({} duplicate draft(s) skipped)",
            result.duplicates
        ));
        return;
    }

    if result.preview {
        println!("{}", "Preview (nothing saved)".bold());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Type", "Amount", "Category", "Tags"]);
    for record in &result.imported {
        table.add_row(vec![
            record.draft.transaction_type.as_str().to_string(),
            record.draft.amount.to_string(),
            record.draft.category.clone(),
            record.draft.tags.join(", "),
        ]);
    }
    println!("{}", table);

    if let Some(note) = result.imported.iter().find_map(|r| r.draft.note.as_deref()) {
        println!("{}", note.dimmed());
    }
    if result.duplicates > 0 {
        output::info(&format!("{} duplicate draft(s) skipped", result.duplicates));
    }
    if !result.preview {
        output::success(&format!(
            "Imported {} draft(s) in batch {}",
            result.imported.len(),
            result.batch_id
        ));
    }
}
