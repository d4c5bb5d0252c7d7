use crate::domain::checkout::{CheckoutCallbacks, CheckoutOptions};
use crate::domain::money::format_minor;
use crate::domain::payment::{CheckoutEvent, CheckoutFailure, CheckoutResponse};
use crate::domain::ports::CheckoutWidget;
use crate::error::Result;
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use tracing::warn;

type SharedReader = Arc<Mutex<Box<dyn BufRead + Send>>>;
type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// A checkout operated from a terminal.
///
/// Shows the order summary and reads one line:
/// - blank: the modal was dismissed;
/// - `fail:<reason>`: the payment failed with `reason`;
/// - `<payment_id> [signature]`: the payment completed.
pub struct ConsoleCheckout {
    input: SharedReader,
    output: SharedWriter,
}

impl ConsoleCheckout {
    pub fn new(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Arc::new(Mutex::new(Box::new(input))),
            output: Arc::new(Mutex::new(Box::new(output))),
        }
    }

    pub fn stdio() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

/// Interprets one line of operator input for the order `order_id`.
pub fn parse_outcome(line: &str, order_id: &str) -> CheckoutEvent {
    let line = line.trim();
    if line.is_empty() {
        return CheckoutEvent::Dismissed;
    }
    if let Some(reason) = line.strip_prefix("fail:") {
        let reason = reason.trim();
        return CheckoutEvent::Failed(CheckoutFailure {
            description: (!reason.is_empty()).then(|| reason.to_string()),
            message: None,
        });
    }
    let mut parts = line.split_whitespace();
    let payment_id = parts.next().unwrap_or_default().to_string();
    let signature = parts.next().unwrap_or_default().to_string();
    CheckoutEvent::Completed(CheckoutResponse {
        payment_id,
        order_id: order_id.to_string(),
        signature,
    })
}

#[async_trait]
impl CheckoutWidget for ConsoleCheckout {
    fn open(&self, options: CheckoutOptions, callbacks: CheckoutCallbacks) -> Result<()> {
        {
            let mut out = self
                .output
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            writeln!(out, "== {} ==", options.name)?;
            writeln!(out, "{}", options.description)?;
            writeln!(
                out,
                "Order {}: {}",
                options.order_id,
                format_minor(options.amount, &options.currency)
            )?;
            writeln!(out, "Paying as {} <{}>", options.prefill.name, options.prefill.email)?;
            write!(
                out,
                "Enter '<payment_id> <signature>', 'fail:<reason>', or nothing to cancel: "
            )?;
            out.flush()?;
        }

        let input = Arc::clone(&self.input);
        let order_id = options.order_id;
        tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            let read = input
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .read_line(&mut line);
            match read {
                Ok(_) => callbacks.deliver(parse_outcome(&line, &order_id)),
                Err(e) => {
                    warn!(error = %e, "could not read checkout input");
                    callbacks.dismiss();
                }
            }
        });
        Ok(())
    }
}
