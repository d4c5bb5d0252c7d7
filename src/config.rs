//! Runtime configuration for the backend client and the checkout.

use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_MERCHANT_NAME: &str = "Billflow";
pub const DEFAULT_THEME_COLOR: &str = "#3399cc";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a completed checkout is confirmed with the backend before it is
/// reported as a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationPolicy {
    #[default]
    Required,
    Skip,
}

/// Settings for the backend HTTP client.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Settings for opening the checkout.
///
/// There is no fallback key: without one, checkout refuses to open.
#[derive(Debug)]
pub struct CheckoutConfig {
    pub key: Option<SecretString>,
    pub merchant_name: String,
    pub theme_color: String,
    pub verification: VerificationPolicy,
    pub timeout: Option<Duration>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            key: None,
            merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            verification: VerificationPolicy::Required,
            timeout: None,
        }
    }
}

impl CheckoutConfig {
    /// Blank keys count as absent.
    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key = key
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);
        self
    }

    pub fn with_merchant_name(mut self, name: impl Into<String>) -> Self {
        self.merchant_name = name.into();
        self
    }

    pub fn with_theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = color.into();
        self
    }

    pub fn with_verification(mut self, policy: VerificationPolicy) -> Self {
        self.verification = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
