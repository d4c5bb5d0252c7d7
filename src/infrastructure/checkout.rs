use crate::config::CheckoutConfig;
use crate::domain::checkout::{CheckoutCallbacks, CheckoutOptions, Prefill, Theme};
use crate::domain::order::Order;
use crate::domain::payment::{CheckoutEvent, CheckoutFailure};
use crate::domain::ports::CheckoutWidgetBox;
use crate::error::{BillingError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// Lifecycle of the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkState {
    Loading,
    Ready,
    Failed(String),
}

/// Bridges the callback-driven checkout widget into a single awaited event.
///
/// The adapter is built once at startup. Until [`CheckoutAdapter::initialize`]
/// has brought the widget to `Ready`, every `open` fails with
/// `SdkUnavailable`; a missing checkout key fails with `MissingCredential`.
pub struct CheckoutAdapter {
    widget: CheckoutWidgetBox,
    config: CheckoutConfig,
    state: RwLock<SdkState>,
}

impl CheckoutAdapter {
    pub fn new(widget: CheckoutWidgetBox, config: CheckoutConfig) -> Self {
        Self {
            widget,
            config,
            state: RwLock::new(SdkState::Loading),
        }
    }

    /// Builds the adapter and loads the widget in one step.
    pub async fn start(widget: CheckoutWidgetBox, config: CheckoutConfig) -> Self {
        let adapter = Self::new(widget, config);
        adapter.initialize().await;
        adapter
    }

    /// Loads the widget and records whether it became usable.
    pub async fn initialize(&self) -> SdkState {
        let next = match self.widget.load().await {
            Ok(()) => SdkState::Ready,
            Err(BillingError::SdkUnavailable { reason }) => {
                warn!(%reason, "checkout widget failed to load");
                SdkState::Failed(reason)
            }
            Err(e) => {
                warn!(error = %e, "checkout widget failed to load");
                SdkState::Failed(e.to_string())
            }
        };
        self.set_state(next.clone());
        next
    }

    pub fn state(&self) -> SdkState {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    fn set_state(&self, next: SdkState) {
        match self.state.write() {
            Ok(mut state) => *state = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Fails fast when the checkout cannot be opened at all.
    pub fn ensure_available(&self) -> Result<()> {
        match self.state() {
            SdkState::Ready => {}
            SdkState::Loading => {
                return Err(BillingError::SdkUnavailable {
                    reason: "checkout has not finished loading".to_string(),
                });
            }
            SdkState::Failed(reason) => return Err(BillingError::SdkUnavailable { reason }),
        }
        if self.config.key.is_none() {
            return Err(BillingError::MissingCredential);
        }
        Ok(())
    }

    /// Builds the widget configuration for an order.
    pub fn options_for(&self, order: &Order, description: &str) -> Result<CheckoutOptions> {
        let key = self
            .config
            .key
            .as_ref()
            .ok_or(BillingError::MissingCredential)?;

        Ok(CheckoutOptions {
            key: SecretString::from(key.expose_secret().to_string()),
            amount: order.amount,
            currency: order.currency.clone(),
            name: self.config.merchant_name.clone(),
            description: description.to_string(),
            order_id: order.id.clone(),
            prefill: Prefill {
                name: order.customer.name.clone(),
                email: order.customer.email.clone(),
                contact: order.customer.contact.clone(),
            },
            theme: Theme {
                color: self.config.theme_color.clone(),
            },
        })
    }

    /// Opens the checkout for `order` and waits for its outcome.
    ///
    /// A widget that drops its callbacks without reporting counts as a
    /// dismissal. With a configured timeout, an unanswered checkout settles as
    /// a failure.
    pub async fn open(&self, order: &Order, description: &str) -> Result<CheckoutEvent> {
        self.ensure_available()?;
        let options = self.options_for(order, description)?;
        let (callbacks, outcome) = CheckoutCallbacks::channel();

        info!(order_id = %order.id, amount = %order.amount, "opening checkout");
        self.widget.open(options, callbacks)?;

        let received = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, outcome).await {
                Ok(received) => received,
                Err(_) => {
                    warn!(order_id = %order.id, ?limit, "checkout timed out");
                    return Ok(CheckoutEvent::Failed(CheckoutFailure::described(
                        "Checkout timed out",
                    )));
                }
            },
            None => outcome.await,
        };

        let event = received.unwrap_or_else(|_| {
            debug!(order_id = %order.id, "checkout closed without an outcome");
            CheckoutEvent::Dismissed
        });
        Ok(event)
    }
}
