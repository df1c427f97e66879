//! Drafts command - list stored transaction drafts

use anyhow::Result;
use rust_decimal::Decimal;

use super::{get_context, get_logger, log_command};
use crate::output;
use finospark_core::{ImportedTransaction, TransactionType};

pub fn run(all_users: bool, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "drafts");

    let ctx = get_context()?;
    let user = if all_users { None } else { ctx.user_id() };
    let records = ctx.import_service.list(user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No drafts found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Imported", "User", "Type", "Amount", "Label", "Fingerprint"]);

    for record in &records {
        table.add_row(vec![
            record.imported_at.format("%Y-%m-%d %H:%M").to_string(),
            record.user_id.clone(),
            record.draft.transaction_type.as_str().to_string(),
            record.draft.amount.to_string(),
            record.draft.label.clone(),
            record.fingerprint.clone(),
        ]);
    }

    println!("{}", table);
    println!();
    match net_amount(&records) {
        Some(net) => println!("{} draft(s), net {}", records.len(), net),
        None => println!("{} draft(s), net unavailable (overflow)", records.len()),
    }
    Ok(())
}

/// Credits minus debits, or `None` if the sum leaves the decimal range
fn net_amount(records: &[ImportedTransaction]) -> Option<Decimal> {
    records.iter().try_fold(Decimal::ZERO, |net, record| match record.draft.transaction_type {
        TransactionType::Debit => net.checked_sub(record.draft.amount),
        TransactionType::Credit => net.checked_add(record.draft.amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use finospark_core::domain::TransactionSource;
    use finospark_core::TransactionDraft;

    fn record(amount: Decimal, transaction_type: TransactionType) -> ImportedTransaction {
        ImportedTransaction::new(
            TransactionDraft {
                amount,
                transaction_type,
                category: "Cafe".to_string(),
                description: "Cafe total".to_string(),
                label: "Cafe".to_string(),
                timestamp: Utc::now(),
                note: None,
                tags: vec!["receipt".to_string()],
                source: TransactionSource::Ai,
            },
            "local",
        )
    }

    #[test]
    fn test_net_amount() {
        let records = vec![
            record(Decimal::new(450, 0), TransactionType::Debit),
            record(Decimal::new(100, 0), TransactionType::Credit),
        ];
        assert_eq!(net_amount(&records), Some(Decimal::new(-350, 0)));
        assert_eq!(net_amount(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_net_amount_overflow_is_unavailable() {
        let records = vec![
            record(Decimal::MAX, TransactionType::Debit),
            record(Decimal::MAX, TransactionType::Debit),
        ];
        assert_eq!(net_amount(&records), None);
    }
}
