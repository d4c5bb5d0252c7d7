use crate::config::BackendConfig;
use crate::domain::analytics::{AnalyticsPeriod, AnalyticsSummary};
use crate::domain::order::{Order, OrderRequest};
use crate::domain::payment::{VerificationPayload, VerificationResult};
use crate::domain::ports::BillingBackend;
use crate::domain::transaction::{HistoryResponse, Transaction};
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub const HISTORY_PATH: &str = "history";
pub const ANALYTICS_PATH: &str = "analytics";
pub const ORDER_PATH: &str = "order";
pub const VERIFY_PATH: &str = "verify";

const ORDER_FALLBACK: &str = "Failed to create order";
const VERIFY_FALLBACK: &str = "Payment verification failed";

/// The billing backend reached over HTTP with JSON bodies.
///
/// All four endpoints hang off a single base URL. Calls are made at most
/// once; nothing is retried here.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BillingError::Network {
                message: format!("Failed to create client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        debug!(%url, ?query, "GET");

        let network = |message: String| BillingError::Network { message };
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| network(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, &format!("{} request failed ({})", path, status)).await;
            warn!(%url, %status, %message, "backend rejected request");
            return Err(network(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| network(format!("Invalid {} response: {}", path, e)))
    }

    async fn post_json<B, T, F>(&self, path: &str, body: &B, fallback: &str, wrap: F) -> Result<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
        F: Fn(String) -> BillingError,
    {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(format!("{}: {}", fallback, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, fallback).await;
            warn!(%url, %status, %message, "backend rejected request");
            return Err(wrap(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| wrap(format!("{}: invalid response: {}", fallback, e)))
    }
}

/// Pulls the backend's structured error text out of a failed response.
///
/// Looks at `error` (a string, or an object with `description`/`message`),
/// then `message`, and falls back to `fallback`.
async fn error_message(response: reqwest::Response, fallback: &str) -> String {
    let body = response.text().await.unwrap_or_default();
    extract_error(&body).unwrap_or_else(|| fallback.to_string())
}

pub fn extract_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let text = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let from_error = match value.get("error") {
        Some(Value::Object(inner)) => inner
            .get("description")
            .and_then(text)
            .or_else(|| inner.get("message").and_then(text)),
        Some(other) => text(other),
        None => None,
    };
    from_error.or_else(|| value.get("message").and_then(text))
}

#[async_trait]
impl BillingBackend for HttpBackend {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<Transaction>> {
        let response: HistoryResponse = self
            .get_json(HISTORY_PATH, &[("limit", limit.to_string())])
            .await?;
        Ok(response.history)
    }

    async fn fetch_analytics(&self, period: AnalyticsPeriod) -> Result<AnalyticsSummary> {
        self.get_json(ANALYTICS_PATH, &[("period", period.to_string())])
            .await
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order> {
        self.post_json(ORDER_PATH, request, ORDER_FALLBACK, |message| {
            BillingError::OrderCreation { message }
        })
        .await
    }

    async fn verify_payment(&self, payload: &VerificationPayload) -> Result<VerificationResult> {
        self.post_json(VERIFY_PATH, payload, VERIFY_FALLBACK, |message| {
            BillingError::Verification { message }
        })
        .await
    }
}
