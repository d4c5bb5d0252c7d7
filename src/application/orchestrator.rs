use super::tracker::{Operation, RequestTracker};
use crate::config::VerificationPolicy;
use crate::domain::order::{Customer, OrderRequest};
use crate::domain::payment::{
    CheckoutEvent, CheckoutResponse, CheckoutState, PaymentResult, VerificationPayload,
};
use crate::domain::plan::Plan;
use crate::domain::ports::SharedBackend;
use crate::error::{BillingError, Result};
use crate::infrastructure::checkout::CheckoutAdapter;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{info, warn};

const VERIFICATION_REJECTED: &str = "Payment verification failed";
const CYCLE_INTERRUPTED: &str = "Checkout was interrupted before it settled";
const CYCLE_OPERATIONS: [Operation; 3] = [
    Operation::Checkout,
    Operation::CreateOrder,
    Operation::Verify,
];

/// Drives one plan purchase from order creation to a settled outcome.
///
/// A cycle runs `CreatingOrder -> AwaitingCheckout -> Verifying -> Settled`.
/// `Settled` is the resting state until the next `submit` or
/// [`PaymentOrchestrator::reset`] returns it to `Idle`. Only one cycle may run
/// at a time; a second `submit` while one is active is rejected with
/// `CheckoutInProgress`. Loading and error state is recorded per request in
/// the shared [`RequestTracker`].
///
/// A cycle whose future is dropped before settling goes back to `Idle` and
/// its outstanding requests are marked failed.
pub struct PaymentOrchestrator {
    backend: SharedBackend,
    checkout: CheckoutAdapter,
    tracker: RequestTracker,
    state: watch::Sender<CheckoutState>,
    cycle: Mutex<()>,
    last_result: RwLock<Option<PaymentResult>>,
}

impl PaymentOrchestrator {
    pub fn new(backend: SharedBackend, checkout: CheckoutAdapter, tracker: RequestTracker) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);
        Self {
            backend,
            checkout,
            tracker,
            state,
            cycle: Mutex::new(()),
            last_result: RwLock::new(None),
        }
    }

    /// Observes state transitions.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub async fn last_result(&self) -> Option<PaymentResult> {
        self.last_result.read().await.clone()
    }

    /// Moves a settled orchestrator back to `Idle`. A running cycle is left alone.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, CheckoutState::Settled(_)) {
                *state = CheckoutState::Idle;
                true
            } else {
                false
            }
        });
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Looks the plan up by id, then runs [`PaymentOrchestrator::submit`].
    pub async fn submit_by_id(&self, plan_id: &str, customer: Customer) -> Result<PaymentResult> {
        let plan = Plan::find(plan_id)?;
        self.submit(plan, customer).await
    }

    /// Buys `plan` for `customer`.
    ///
    /// Every outcome, including order and checkout failures, comes back as a
    /// [`PaymentResult`]; the only error is a cycle already in progress.
    /// Retrying is just calling `submit` again.
    pub async fn submit(&self, plan: &Plan, customer: Customer) -> Result<PaymentResult> {
        let _cycle = self
            .cycle
            .try_lock()
            .map_err(|_| BillingError::CheckoutInProgress)?;
        let mut guard = CycleGuard {
            orchestrator: self,
            settled: false,
        };

        info!(plan = plan.id, "starting checkout");
        let result = self.run_cycle(plan, customer).await;

        match &result {
            PaymentResult::Success { reference } => info!(plan = plan.id, %reference, "payment settled"),
            PaymentResult::Failure { reason } => warn!(plan = plan.id, %reason, "payment failed"),
            PaymentResult::Cancelled => info!(plan = plan.id, "checkout cancelled"),
        }

        *self.last_result.write().await = Some(result.clone());
        guard.settled = true;
        self.transition(CheckoutState::Settled(result.clone()));
        Ok(result)
    }

    async fn run_cycle(&self, plan: &Plan, customer: Customer) -> PaymentResult {
        let checkout_id = self.tracker.begin(Operation::Checkout).await;

        // Refuse before any order exists when the checkout cannot open.
        if let Err(e) = self.checkout.ensure_available() {
            self.tracker.fail(checkout_id, e.to_string()).await;
            return PaymentResult::failure(e.to_string());
        }

        self.transition(CheckoutState::CreatingOrder);
        let request = OrderRequest::for_plan(plan, customer, Utc::now());
        let order_id = self.tracker.begin(Operation::CreateOrder).await;
        let order = match self.backend.create_order(&request).await {
            Ok(order) => {
                self.tracker.succeed(order_id).await;
                order
            }
            Err(e) => {
                let message = e.to_string();
                self.tracker.fail(order_id, message.clone()).await;
                self.tracker.fail(checkout_id, message.clone()).await;
                return PaymentResult::failure(message);
            }
        };

        self.transition(CheckoutState::AwaitingCheckout {
            order_id: order.id.clone(),
        });
        let description = format!("{} plan subscription", plan.name);
        let event = match self.checkout.open(&order, &description).await {
            Ok(event) => event,
            Err(e) => {
                self.tracker.fail(checkout_id, e.to_string()).await;
                return PaymentResult::failure(e.to_string());
            }
        };

        let result = match event {
            CheckoutEvent::Completed(response) => self.confirm(plan, &response).await,
            CheckoutEvent::Failed(failure) => PaymentResult::failure(failure.reason()),
            CheckoutEvent::Dismissed => PaymentResult::Cancelled,
        };

        match &result {
            PaymentResult::Failure { reason } => {
                let message = BillingError::PaymentFailure(reason.clone()).to_string();
                self.tracker.fail(checkout_id, message).await;
            }
            _ => self.tracker.succeed(checkout_id).await,
        }
        result
    }

    /// Confirms a completed checkout with the backend unless verification is
    /// switched off.
    async fn confirm(&self, plan: &Plan, response: &CheckoutResponse) -> PaymentResult {
        let success = PaymentResult::Success {
            reference: response.payment_id.clone(),
        };
        if self.checkout.config().verification == VerificationPolicy::Skip {
            return success;
        }

        self.transition(CheckoutState::Verifying {
            order_id: response.order_id.clone(),
        });
        let payload = VerificationPayload::from_response(response, Some(plan.id));
        let verify_id = self.tracker.begin(Operation::Verify).await;

        match self.backend.verify_payment(&payload).await {
            Ok(result) if result.verified => {
                self.tracker.succeed(verify_id).await;
                success
            }
            Ok(result) => {
                let reason = result
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| VERIFICATION_REJECTED.to_string());
                self.tracker.fail(verify_id, reason.clone()).await;
                PaymentResult::failure(reason)
            }
            Err(e) => {
                self.tracker.fail(verify_id, e.to_string()).await;
                PaymentResult::failure(e.to_string())
            }
        }
    }

    fn transition(&self, next: CheckoutState) {
        self.state.send_replace(next);
    }
}

/// Cleans up after a cycle whose future was dropped mid-flight.
struct CycleGuard<'a> {
    orchestrator: &'a PaymentOrchestrator,
    settled: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(state = ?self.orchestrator.state(), "checkout cycle dropped before settling");
        self.orchestrator
            .tracker
            .interrupt(&CYCLE_OPERATIONS, CYCLE_INTERRUPTED);
        self.orchestrator.transition(CheckoutState::Idle);
    }
}
