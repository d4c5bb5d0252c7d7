use crate::domain::checkout::{CheckoutCallbacks, CheckoutOptions};
use crate::domain::payment::CheckoutEvent;
use crate::domain::ports::CheckoutWidget;
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared view of how many times a [`ScriptedCheckout`] was opened.
#[derive(Debug, Clone, Default)]
pub struct OpenCount(Arc<AtomicUsize>);

impl OpenCount {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A checkout widget that replays pre-recorded outcomes.
///
/// Each `open` reports the next queued event from a spawned task, the way a
/// real modal calls back after `open` has returned. With nothing queued the
/// callbacks are dropped unreported, unless [`ScriptedCheckout::hold_open`]
/// was set, in which case the modal never answers.
#[derive(Default)]
pub struct ScriptedCheckout {
    script: Mutex<VecDeque<CheckoutEvent>>,
    load_error: Option<String>,
    hold_open: bool,
    held: Mutex<Vec<CheckoutCallbacks>>,
    opens: OpenCount,
}

impl ScriptedCheckout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next opening.
    pub fn then(self, event: CheckoutEvent) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(event);
        }
        self
    }

    pub fn failing_load(mut self, reason: impl Into<String>) -> Self {
        self.load_error = Some(reason.into());
        self
    }

    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    pub fn open_count(&self) -> OpenCount {
        self.opens.clone()
    }
}

#[async_trait]
impl CheckoutWidget for ScriptedCheckout {
    async fn load(&self) -> Result<()> {
        match &self.load_error {
            Some(reason) => Err(BillingError::SdkUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn open(&self, _options: CheckoutOptions, callbacks: CheckoutCallbacks) -> Result<()> {
        self.opens.0.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(event) => {
                tokio::spawn(async move { callbacks.deliver(event) });
            }
            None if self.hold_open => {
                if let Ok(mut held) = self.held.lock() {
                    held.push(callbacks);
                }
            }
            None => drop(callbacks),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::CheckoutFailure;

    #[tokio::test]
    async fn test_replays_events_in_order() {
        let widget = ScriptedCheckout::new()
            .then(CheckoutEvent::Dismissed)
            .then(CheckoutEvent::Failed(CheckoutFailure::described("declined")));
        let opens = widget.open_count();

        for expected in [
            CheckoutEvent::Dismissed,
            CheckoutEvent::Failed(CheckoutFailure::described("declined")),
        ] {
            let (callbacks, rx) = CheckoutCallbacks::channel();
            widget.open(dummy_options(), callbacks).unwrap();
            assert_eq!(rx.await.unwrap(), expected);
        }
        assert_eq!(opens.get(), 2);
    }

    fn dummy_options() -> CheckoutOptions {
        use crate::domain::checkout::{Prefill, Theme};
        use crate::domain::money::MinorUnits;
        CheckoutOptions {
            key: "key".to_string().into(),
            amount: MinorUnits(100),
            currency: "INR".to_string(),
            name: "Billflow".to_string(),
            description: "test".to_string(),
            order_id: "order_1".to_string(),
            prefill: Prefill::default(),
            theme: Theme {
                color: "#000".to_string(),
            },
        }
    }
}
