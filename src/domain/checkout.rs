use super::money::MinorUnits;
use super::payment::{CheckoutEvent, CheckoutFailure, CheckoutResponse};
use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::oneshot;

/// Fields pre-filled in the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Configuration handed to the checkout widget when opening the modal.
///
/// `key` is the publishable checkout key; its `Debug` output is redacted.
#[derive(Debug)]
pub struct CheckoutOptions {
    pub key: SecretString,
    pub amount: MinorUnits,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

/// The hooks a widget reports through: success handler, `payment.failed`
/// subscription and modal dismissal.
///
/// Every hook consumes the value, so a widget can report at most one outcome
/// per opening. Dropping it unreported is treated as a dismissal.
#[derive(Debug)]
pub struct CheckoutCallbacks {
    tx: oneshot::Sender<CheckoutEvent>,
}

impl CheckoutCallbacks {
    pub fn channel() -> (Self, oneshot::Receiver<CheckoutEvent>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn success(self, response: CheckoutResponse) {
        self.deliver(CheckoutEvent::Completed(response));
    }

    pub fn payment_failed(self, failure: CheckoutFailure) {
        self.deliver(CheckoutEvent::Failed(failure));
    }

    pub fn dismiss(self) {
        self.deliver(CheckoutEvent::Dismissed);
    }

    pub fn deliver(self, event: CheckoutEvent) {
        // The receiver is gone when the attempt already timed out.
        let _ = self.tx.send(event);
    }
}
