use serde::{Deserialize, Serialize};

/// Fallback reason when the checkout reports a failure without any text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The data the checkout widget hands to its success handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

/// The payload of the widget's `payment.failed` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutFailure {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CheckoutFailure {
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            message: None,
        }
    }

    /// The user-facing reason: `description`, then `message`, then a fallback.
    pub fn reason(&self) -> String {
        [&self.description, &self.message]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

/// What came back from one opening of the checkout modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    Completed(CheckoutResponse),
    Failed(CheckoutFailure),
    Dismissed,
}

/// The single outcome of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PaymentResult {
    Success { reference: String },
    Failure { reason: String },
    Cancelled,
}

impl PaymentResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        PaymentResult::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentResult::Success { .. })
    }
}

/// Body of `POST /verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPayload {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

impl VerificationPayload {
    pub fn from_response(response: &CheckoutResponse, plan_id: Option<&str>) -> Self {
        Self {
            order_id: response.order_id.clone(),
            payment_id: response.payment_id.clone(),
            signature: response.signature.clone(),
            plan_id: plan_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Where a checkout cycle currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    CreatingOrder,
    AwaitingCheckout { order_id: String },
    Verifying { order_id: String },
    Settled(PaymentResult),
}

impl CheckoutState {
    /// True while a cycle holds the orchestrator.
    pub fn is_busy(&self) -> bool {
        !matches!(self, CheckoutState::Idle | CheckoutState::Settled(_))
    }
}
