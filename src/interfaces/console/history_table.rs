use super::derived::status_breakdown;
use crate::domain::money::format_minor;
use crate::domain::transaction::Transaction;
use std::fmt::Write;

pub const NO_HISTORY: &str = "No transactions found";

/// Renders history records as a fixed-width table followed by a status summary.
pub fn render_history(records: &[Transaction]) -> String {
    if records.is_empty() {
        return format!("{NO_HISTORY}\n");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<17} {:<22} {:>14} {:<9} {:<11} {}",
        "Date", "Order", "Amount", "Status", "Method", "Customer"
    );
    for record in records {
        let customer = match (&record.customer_name, &record.customer_email) {
            (Some(name), Some(email)) => format!("{name} <{email}>"),
            (Some(name), None) => name.clone(),
            (None, Some(email)) => email.clone(),
            (None, None) => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<17} {:<22} {:>14} {:<9} {:<11} {}",
            record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            record.order_id,
            format_minor(record.amount, &record.currency),
            record.status.as_str(),
            record.method.as_deref().unwrap_or("-"),
            customer
        );
    }

    let shares: Vec<String> = status_breakdown(records)
        .into_iter()
        .map(|share| format!("{} {} ({:.1}%)", share.status, share.count, share.percent))
        .collect();
    let _ = writeln!(out, "\n{} transactions: {}", records.len(), shares.join(", "));
    out
}
