use super::derived::{percentage, success_rate};
use crate::domain::analytics::AnalyticsSummary;
use crate::domain::money::{INR, format_currency};
use rust_decimal::Decimal;
use std::fmt::Write;

pub const NO_DATA: &str = "No transaction data for this period";

/// Renders the analytics panel, or the empty state when there is nothing to show.
pub fn render_analytics(summary: &AnalyticsSummary) -> String {
    if !summary.has_data() {
        return format!("{NO_DATA}\n");
    }

    let currency = if summary.currency.is_empty() {
        INR
    } else {
        summary.currency.as_str()
    };
    // Amounts come in minor units.
    let major = |minor: Decimal| format_currency(minor / Decimal::ONE_HUNDRED, currency);
    let total = summary.total_transactions;

    let mut out = String::new();
    let period = if summary.period.is_empty() {
        "all time"
    } else {
        summary.period.as_str()
    };
    let _ = writeln!(out, "Payment analytics ({period})");
    let _ = writeln!(out, "  {:<22}{:>12}", "Total transactions", total);
    for (label, count) in [
        ("Successful", summary.successful_transactions),
        ("Failed", summary.failed_transactions),
        ("Pending", summary.pending_transactions),
    ] {
        let _ = writeln!(
            out,
            "  {:<22}{:>12}  ({:.1}%)",
            label,
            count,
            percentage(count, total)
        );
    }
    let _ = writeln!(out, "  {:<22}{:>12}", "Total amount", major(summary.total_amount));
    let _ = writeln!(
        out,
        "  {:<22}{:>12}",
        "Average amount",
        major(summary.average_transaction_amount)
    );
    let _ = writeln!(out, "  {:<22}{:>11.1}%", "Success rate", success_rate(summary));
    out
}
