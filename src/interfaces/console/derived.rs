//! Display values derived from already-fetched data.
//!
//! These are recomputed on every render; nothing here is cached.

use crate::domain::analytics::AnalyticsSummary;
use crate::domain::transaction::{Transaction, TransactionStatus};
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `part` as a percentage of `total`, rounded to one decimal place.
///
/// Zero when `total` is zero; never above 100.
pub fn percentage(part: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    let ratio = Decimal::from(part.min(total)) * HUNDRED / Decimal::from(total);
    ratio.round_dp(1)
}

pub fn success_rate(summary: &AnalyticsSummary) -> Decimal {
    percentage(summary.successful_transactions, summary.total_transactions)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusShare {
    pub status: TransactionStatus,
    pub count: u64,
    pub percent: Decimal,
}

/// Per-status counts and shares of `records`, skipping absent statuses.
pub fn status_breakdown(records: &[Transaction]) -> Vec<StatusShare> {
    let total = records.len() as u64;
    TransactionStatus::ALL
        .into_iter()
        .map(|status| {
            let count = records.iter().filter(|r| r.status == status).count() as u64;
            StatusShare {
                status,
                count,
                percent: percentage(count, total),
            }
        })
        .filter(|share| share.count > 0)
        .collect()
}
