use crate::domain::transaction::Transaction;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One CSV row; amounts are written in major units.
#[derive(Serialize)]
struct HistoryRow<'a> {
    created_at: String,
    order_id: &'a str,
    amount: rust_decimal::Decimal,
    currency: &'a str,
    status: &'a str,
    method: Option<&'a str>,
    customer_name: Option<&'a str>,
    customer_email: Option<&'a str>,
}

/// Writes history records as CSV to any `Write` sink (e.g., Stdout, File).
pub struct HistoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> HistoryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes the header (on the first row) and one line per record, then flushes.
    pub fn write_history(&mut self, records: &[Transaction]) -> Result<()> {
        for record in records {
            self.writer.serialize(HistoryRow {
                created_at: record.created_at.to_rfc3339(),
                order_id: &record.order_id,
                amount: record.amount.to_major(),
                currency: &record.currency,
                status: record.status.as_str(),
                method: record.method.as_deref(),
                customer_name: record.customer_name.as_deref(),
                customer_email: record.customer_email.as_deref(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
