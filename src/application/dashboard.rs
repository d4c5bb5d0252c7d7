use super::tracker::{Operation, RequestTracker};
use crate::domain::analytics::{AnalyticsPeriod, AnalyticsSummary};
use crate::domain::ports::SharedBackend;
use crate::domain::transaction::Transaction;
use crate::error::{BillingError, Result};
use tracing::{debug, warn};

/// Read-side queries behind the history table and the analytics view.
pub struct BillingDashboard {
    backend: SharedBackend,
    tracker: RequestTracker,
}

impl BillingDashboard {
    pub fn new(backend: SharedBackend, tracker: RequestTracker) -> Self {
        Self { backend, tracker }
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Fetches up to `limit` history records in the order the backend keeps them.
    pub async fn load_payment_history(&self, limit: usize) -> Result<Vec<Transaction>> {
        let id = self.tracker.begin(Operation::History).await;
        match self.backend.fetch_history(limit).await {
            Ok(history) => {
                debug!(count = history.len(), limit, "loaded payment history");
                self.tracker.succeed(id).await;
                Ok(history)
            }
            Err(e) => {
                let e = as_network(e);
                warn!(error = %e, "failed to load payment history");
                self.tracker.fail(id, e.to_string()).await;
                Err(e)
            }
        }
    }

    pub async fn load_analytics(&self, period: AnalyticsPeriod) -> Result<AnalyticsSummary> {
        let id = self.tracker.begin(Operation::Analytics).await;
        match self.backend.fetch_analytics(period).await {
            Ok(summary) => {
                debug!(%period, total = summary.total_transactions, "loaded analytics");
                self.tracker.succeed(id).await;
                Ok(summary)
            }
            Err(e) => {
                let e = as_network(e);
                warn!(error = %e, %period, "failed to load analytics");
                self.tracker.fail(id, e.to_string()).await;
                Err(e)
            }
        }
    }
}

// Read failures always surface as a retryable network error.
fn as_network(error: BillingError) -> BillingError {
    match error {
        BillingError::Network { .. } => error,
        other => BillingError::Network {
            message: other.to_string(),
        },
    }
}
