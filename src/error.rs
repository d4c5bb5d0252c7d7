use thiserror::Error;

/// Every failure the billing flow can surface.
///
/// The `Display` text of each variant is the human-readable message shown to
/// the user; no structured codes propagate past this type.
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Network error: {message}")]
    Network { message: String },
    #[error("{message}")]
    OrderCreation { message: String },
    #[error("{message}")]
    Verification { message: String },
    #[error("Checkout is unavailable: {reason}")]
    SdkUnavailable { reason: String },
    #[error("Checkout key is not configured; refusing to open checkout")]
    MissingCredential,
    #[error("Payment failed: {0}")]
    PaymentFailure(String),
    #[error("A checkout is already in progress")]
    CheckoutInProgress,
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
