use super::analytics::{AnalyticsPeriod, AnalyticsSummary};
use super::checkout::{CheckoutCallbacks, CheckoutOptions};
use super::order::{Order, OrderRequest};
use super::payment::{VerificationPayload, VerificationResult};
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The billing backend: the only place orders, verification and analytics
/// are actually computed.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<Transaction>>;
    async fn fetch_analytics(&self, period: AnalyticsPeriod) -> Result<AnalyticsSummary>;
    async fn create_order(&self, request: &OrderRequest) -> Result<Order>;
    async fn verify_payment(&self, payload: &VerificationPayload) -> Result<VerificationResult>;
}

/// A third-party checkout widget.
///
/// `load` brings the widget up once at startup. `open` shows the modal and
/// returns immediately; the outcome arrives later through `callbacks`.
#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    fn open(&self, options: CheckoutOptions, callbacks: CheckoutCallbacks) -> Result<()>;
}

/// The backend is shared between the orchestrator and the dashboard.
pub type SharedBackend = Arc<dyn BillingBackend>;
pub type CheckoutWidgetBox = Box<dyn CheckoutWidget>;
