use super::money::MinorUnits;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Captured,
    Pending,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Captured,
        TransactionStatus::Pending,
        TransactionStatus::Failed,
        TransactionStatus::Refunded,
        TransactionStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Captured => "captured",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A payment history record as reported by the backend.
///
/// Records are read-only here and kept in the order the backend returns them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Transaction {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub order_id: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// Envelope of `GET /history`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserialization() {
        let json = r#"{
            "created_at": 1700000000,
            "order_id": "order_1",
            "amount": 49900,
            "currency": "INR",
            "status": "captured",
            "method": "upi"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.created_at.timestamp(), 1_700_000_000);
        assert_eq!(tx.status, TransactionStatus::Captured);
        assert_eq!(tx.method.as_deref(), Some("upi"));
        assert_eq!(tx.customer_name, None);
    }

    #[test]
    fn test_unrecognised_status_is_unknown() {
        let json = r#"{"created_at":0,"order_id":"o","amount":1,"currency":"INR","status":"authorized"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.status, TransactionStatus::Unknown);
    }

    #[test]
    fn test_history_envelope_defaults_to_empty() {
        let response: HistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.history.is_empty());
    }
}
