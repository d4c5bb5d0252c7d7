use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// The kind of work a tracked request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    History,
    Analytics,
    CreateOrder,
    Checkout,
    Verify,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::History => "history",
            Operation::Analytics => "analytics",
            Operation::CreateOrder => "create-order",
            Operation::Checkout => "checkout",
            Operation::Verify => "verify",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    InFlight,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEntry {
    pub operation: Operation,
    pub status: RequestStatus,
}

/// Per-request loading and error state.
///
/// Each request gets its own entry, so "is history loading?" and "did the
/// order fail?" are answered independently. Successful entries are dropped
/// once settled; failures stay until dismissed or until a new request of the
/// same operation begins.
///
/// Cloning shares the underlying map.
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    entries: Arc<RwLock<BTreeMap<RequestId, RequestEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new in-flight request, clearing earlier failures of `operation`.
    pub async fn begin(&self, operation: Operation) -> RequestId {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| {
            !(entry.operation == operation && matches!(entry.status, RequestStatus::Failed(_)))
        });
        entries.insert(
            id,
            RequestEntry {
                operation,
                status: RequestStatus::InFlight,
            },
        );
        id
    }

    pub async fn succeed(&self, id: RequestId) {
        self.entries.write().await.remove(&id);
    }

    pub async fn fail(&self, id: RequestId, message: impl Into<String>) {
        if let Some(entry) = self.entries.write().await.get_mut(&id) {
            entry.status = RequestStatus::Failed(message.into());
        }
    }

    pub async fn status(&self, id: RequestId) -> Option<RequestStatus> {
        self.entries.read().await.get(&id).map(|e| e.status.clone())
    }

    pub async fn is_loading(&self, operation: Operation) -> bool {
        self.entries
            .read()
            .await
            .values()
            .any(|e| e.operation == operation && e.status == RequestStatus::InFlight)
    }

    pub async fn any_loading(&self) -> bool {
        self.entries
            .read()
            .await
            .values()
            .any(|e| e.status == RequestStatus::InFlight)
    }

    /// Outstanding failures, oldest first.
    pub async fn errors(&self) -> Vec<(Operation, String)> {
        self.entries
            .read()
            .await
            .values()
            .filter_map(|e| match &e.status {
                RequestStatus::Failed(message) => Some((e.operation, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub async fn last_error(&self, operation: Operation) -> Option<String> {
        self.errors()
            .await
            .into_iter()
            .rev()
            .find(|(op, _)| *op == operation)
            .map(|(_, message)| message)
    }

    /// Clears the failures recorded for `operation`.
    pub async fn dismiss(&self, operation: Operation) {
        self.entries.write().await.retain(|_, entry| {
            !(entry.operation == operation && matches!(entry.status, RequestStatus::Failed(_)))
        });
    }

    /// Fails every in-flight request of `operations` with `message`.
    ///
    /// Callable from `Drop`. The lock is taken without waiting when it is
    /// free; otherwise the update finishes on a spawned task.
    pub fn interrupt(&self, operations: &[Operation], message: &str) {
        match self.entries.try_write() {
            Ok(mut entries) => fail_in_flight(&mut entries, operations, message),
            Err(_) => {
                let Ok(handle) = tokio::runtime::Handle::try_current() else {
                    return;
                };
                let entries = Arc::clone(&self.entries);
                let operations = operations.to_vec();
                let message = message.to_string();
                handle.spawn(async move {
                    fail_in_flight(&mut *entries.write().await, &operations, &message);
                });
            }
        }
    }
}

fn fail_in_flight(
    entries: &mut BTreeMap<RequestId, RequestEntry>,
    operations: &[Operation],
    message: &str,
) {
    for entry in entries.values_mut() {
        if operations.contains(&entry.operation) && entry.status == RequestStatus::InFlight {
            entry.status = RequestStatus::Failed(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loading_is_per_operation() {
        let tracker = RequestTracker::new();
        let history = tracker.begin(Operation::History).await;
        assert!(tracker.is_loading(Operation::History).await);
        assert!(!tracker.is_loading(Operation::Analytics).await);

        tracker.succeed(history).await;
        assert!(!tracker.any_loading().await);
        assert_eq!(tracker.status(history).await, None);
    }

    #[tokio::test]
    async fn test_failure_persists_until_new_request() {
        let tracker = RequestTracker::new();
        let first = tracker.begin(Operation::CreateOrder).await;
        tracker.fail(first, "boom").await;

        let other = tracker.begin(Operation::History).await;
        tracker.succeed(other).await;
        assert_eq!(
            tracker.last_error(Operation::CreateOrder).await.as_deref(),
            Some("boom")
        );

        let _retry = tracker.begin(Operation::CreateOrder).await;
        assert!(tracker.errors().await.is_empty());
        assert!(tracker.is_loading(Operation::CreateOrder).await);
    }

    #[tokio::test]
    async fn test_dismiss_only_clears_operation() {
        let tracker = RequestTracker::new();
        let a = tracker.begin(Operation::History).await;
        let b = tracker.begin(Operation::Analytics).await;
        tracker.fail(a, "history down").await;
        tracker.fail(b, "analytics down").await;

        tracker.dismiss(Operation::History).await;
        assert_eq!(
            tracker.errors().await,
            vec![(Operation::Analytics, "analytics down".to_string())]
        );
    }

    #[tokio::test]
    async fn test_interrupt_fails_only_in_flight_requests() {
        let tracker = RequestTracker::new();
        let order = tracker.begin(Operation::CreateOrder).await;
        let checkout = tracker.begin(Operation::Checkout).await;
        let history = tracker.begin(Operation::History).await;
        tracker.succeed(order).await;

        tracker.interrupt(&[Operation::CreateOrder, Operation::Checkout], "interrupted");

        assert_eq!(
            tracker.status(checkout).await,
            Some(RequestStatus::Failed("interrupted".to_string()))
        );
        assert_eq!(tracker.status(order).await, None);
        assert_eq!(tracker.status(history).await, Some(RequestStatus::InFlight));
        assert!(!tracker.is_loading(Operation::Checkout).await);
    }

    #[tokio::test]
    async fn test_concurrent_requests_tracked_separately() {
        let tracker = RequestTracker::new();
        let first = tracker.begin(Operation::History).await;
        let second = tracker.begin(Operation::History).await;
        assert_ne!(first, second);

        tracker.succeed(first).await;
        assert!(tracker.is_loading(Operation::History).await);
        tracker.succeed(second).await;
        assert!(!tracker.is_loading(Operation::History).await);
    }
}
