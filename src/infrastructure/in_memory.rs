use crate::domain::analytics::{AnalyticsPeriod, AnalyticsSummary};
use crate::domain::money::{INR, MinorUnits};
use crate::domain::order::{Order, OrderRequest};
use crate::domain::payment::{VerificationPayload, VerificationResult};
use crate::domain::ports::BillingBackend;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory billing backend.
///
/// Keeps orders and history behind `Arc<RwLock<..>>` so clones share state.
/// Used when no backend URL is configured and as a test double: failures of
/// order creation, verification and the read endpoints can be injected.
#[derive(Default, Clone)]
pub struct InMemoryBackend {
    orders: Arc<RwLock<HashMap<String, (Order, OrderRequest)>>>,
    history: Arc<RwLock<Vec<Transaction>>>,
    next_order: Arc<AtomicU64>,
    order_calls: Arc<AtomicU64>,
    verify_calls: Arc<AtomicU64>,
    faults: Arc<RwLock<Faults>>,
}

#[derive(Default, Clone)]
struct Faults {
    reads: Option<String>,
    create_order: Option<String>,
    verify: Option<String>,
    reject_signatures: bool,
}

impl InMemoryBackend {
    /// Creates a new, empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend pre-populated with a small demo history.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let record = |hours: i64,
                      id: &str,
                      rupees: u64,
                      status: TransactionStatus,
                      method: &str,
                      name: &str| Transaction {
            created_at: now - Duration::hours(hours),
            order_id: id.to_string(),
            amount: MinorUnits::from_major(rupees),
            currency: INR.to_string(),
            status,
            method: Some(method.to_string()),
            customer_name: Some(name.to_string()),
            customer_email: Some(format!("{}@example.com", name.to_lowercase())),
        };
        let history = vec![
            record(2, "order_demo_5", 1499, TransactionStatus::Captured, "upi", "Asha"),
            record(20, "order_demo_4", 499, TransactionStatus::Failed, "card", "Ravi"),
            record(30, "order_demo_3", 4999, TransactionStatus::Captured, "netbanking", "Meera"),
            record(50, "order_demo_2", 499, TransactionStatus::Pending, "upi", "Kabir"),
            record(90, "order_demo_1", 1499, TransactionStatus::Refunded, "card", "Asha"),
        ];
        Self {
            history: Arc::new(RwLock::new(history)),
            ..Self::default()
        }
    }

    pub async fn push_history(&self, tx: Transaction) {
        self.history.write().await.insert(0, tx);
    }

    pub async fn fail_reads(&self, message: impl Into<String>) {
        self.faults.write().await.reads = Some(message.into());
    }

    pub async fn fail_order_creation(&self, message: impl Into<String>) {
        self.faults.write().await.create_order = Some(message.into());
    }

    pub async fn fail_verification(&self, message: impl Into<String>) {
        self.faults.write().await.verify = Some(message.into());
    }

    /// Makes `/verify` answer `verified: false` instead of erroring.
    pub async fn reject_signatures(&self) {
        self.faults.write().await.reject_signatures = true;
    }

    pub async fn clear_faults(&self) {
        *self.faults.write().await = Faults::default();
    }

    pub fn order_calls(&self) -> u64 {
        self.order_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> u64 {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub async fn order_request(&self, order_id: &str) -> Option<OrderRequest> {
        self.orders
            .read()
            .await
            .get(order_id)
            .map(|(_, request)| request.clone())
    }
}

#[async_trait]
impl BillingBackend for InMemoryBackend {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<Transaction>> {
        if let Some(message) = self.faults.read().await.reads.clone() {
            return Err(BillingError::Network { message });
        }
        let history = self.history.read().await;
        Ok(history.iter().take(limit).cloned().collect())
    }

    async fn fetch_analytics(&self, period: AnalyticsPeriod) -> Result<AnalyticsSummary> {
        if let Some(message) = self.faults.read().await.reads.clone() {
            return Err(BillingError::Network { message });
        }
        let history = self.history.read().await;
        let count = |status: TransactionStatus| history.iter().filter(|t| t.status == status).count() as u64;

        let total_amount: MinorUnits = history
            .iter()
            .filter(|t| t.status == TransactionStatus::Captured)
            .fold(MinorUnits::ZERO, |acc, t| acc + t.amount);
        let successful = count(TransactionStatus::Captured);
        let average = if successful == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(total_amount.value()) / Decimal::from(successful)).round_dp(2)
        };

        Ok(AnalyticsSummary {
            total_transactions: history.len() as u64,
            successful_transactions: successful,
            failed_transactions: count(TransactionStatus::Failed),
            pending_transactions: count(TransactionStatus::Pending),
            total_amount: Decimal::from(total_amount.value()),
            average_transaction_amount: average,
            period: period.to_string(),
            currency: INR.to_string(),
        })
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.faults.read().await.create_order.clone() {
            return Err(BillingError::OrderCreation { message });
        }

        let id = format!("order_{}", self.next_order.fetch_add(1, Ordering::SeqCst) + 1);
        let order = Order {
            id: id.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            customer: request.customer.clone(),
        };
        self.orders
            .write()
            .await
            .insert(id, (order.clone(), request.clone()));
        Ok(order)
    }

    async fn verify_payment(&self, payload: &VerificationPayload) -> Result<VerificationResult> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let faults = self.faults.read().await.clone();
        if let Some(message) = faults.verify {
            return Err(BillingError::Verification { message });
        }

        let order = self
            .orders
            .read()
            .await
            .get(&payload.order_id)
            .map(|(order, _)| order.clone());
        let Some(order) = order else {
            return Ok(VerificationResult {
                verified: false,
                message: Some(format!("Unknown order {}", payload.order_id)),
            });
        };
        if faults.reject_signatures || payload.signature.is_empty() {
            return Ok(VerificationResult {
                verified: false,
                message: Some("Signature mismatch".to_string()),
            });
        }

        self.push_history(Transaction {
            created_at: Utc::now(),
            order_id: order.id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            status: TransactionStatus::Captured,
            method: None,
            customer_name: Some(order.customer.name.clone()),
            customer_email: Some(order.customer.email.clone()),
        })
        .await;

        Ok(VerificationResult {
            verified: true,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Customer;
    use crate::domain::plan::Plan;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_seeded_history_is_newest_first() {
        let backend = InMemoryBackend::seeded(Utc::now());
        let history = backend.fetch_history(3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_seeded_analytics() {
        let backend = InMemoryBackend::seeded(Utc::now());
        let summary = backend.fetch_analytics(AnalyticsPeriod::Month).await.unwrap();
        assert_eq!(summary.total_transactions, 5);
        assert_eq!(summary.successful_transactions, 2);
        assert_eq!(summary.failed_transactions, 1);
        assert_eq!(summary.pending_transactions, 1);
        assert_eq!(summary.total_amount, dec!(649800));
        assert_eq!(summary.average_transaction_amount, dec!(324900));
        assert_eq!(summary.period, "month");
    }

    #[tokio::test]
    async fn test_empty_analytics_has_no_data() {
        let summary = InMemoryBackend::new()
            .fetch_analytics(AnalyticsPeriod::Day)
            .await
            .unwrap();
        assert!(!summary.has_data());
        assert_eq!(summary.average_transaction_amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_verified_payment_lands_in_history() {
        let backend = InMemoryBackend::new();
        let plan = Plan::find("pro").unwrap();
        let request = OrderRequest::for_plan(plan, Customer::new("Asha", "asha@example.com"), Utc::now());
        let order = backend.create_order(&request).await.unwrap();
        assert_eq!(backend.order_request(&order.id).await, Some(request));

        let result = backend
            .verify_payment(&VerificationPayload {
                order_id: order.id.clone(),
                payment_id: "pay_1".to_string(),
                signature: "sig".to_string(),
                plan_id: Some("pro".to_string()),
            })
            .await
            .unwrap();
        assert!(result.verified);

        let history = backend.fetch_history(10).await.unwrap();
        assert_eq!(history[0].order_id, order.id);
        assert_eq!(history[0].status, TransactionStatus::Captured);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_verified() {
        let backend = InMemoryBackend::new();
        let result = backend
            .verify_payment(&VerificationPayload {
                order_id: "order_missing".to_string(),
                payment_id: "pay_1".to_string(),
                signature: "sig".to_string(),
                plan_id: None,
            })
            .await
            .unwrap();
        assert!(!result.verified);
    }

    #[tokio::test]
    async fn test_injected_read_fault() {
        let backend = InMemoryBackend::seeded(Utc::now());
        backend.fail_reads("backend down").await;
        assert!(matches!(
            backend.fetch_history(10).await,
            Err(BillingError::Network { message }) if message == "backend down"
        ));
        backend.clear_faults().await;
        assert!(backend.fetch_history(10).await.is_ok());
    }
}
