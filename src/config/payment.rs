//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Razorpay)
///
/// Credentials are optional: when neither key is set the server runs
/// with the offline gateway and registrations capture immediately with
/// synthetic payment ids.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Razorpay key id (`rzp_test_...` or `rzp_live_...`)
    pub razorpay_key_id: Option<String>,

    /// Razorpay key secret
    pub razorpay_key_secret: Option<String>,

    /// Currency for gateway orders
    #[serde(default = "default_currency")]
    pub currency: String,

    /// How long a started attempt waits for its capture callback
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_secs: i64,

    /// Request timeout for calls to the gateway API
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl PaymentConfig {
    /// True when real gateway credentials are present.
    pub fn is_configured(&self) -> bool {
        self.razorpay_key_id.is_some() && self.razorpay_key_secret.is_some()
    }

    /// Check if using Razorpay test mode
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id
            .as_deref()
            .map(|k| k.starts_with("rzp_test_"))
            .unwrap_or(false)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (&self.razorpay_key_id, &self.razorpay_key_secret) {
            (None, None) => {}
            (Some(key_id), Some(_)) => {
                if !key_id.starts_with("rzp_") {
                    return Err(ValidationError::InvalidRazorpayKeyId);
                }
            }
            _ => return Err(ValidationError::PartialGatewayCredentials),
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.capture_timeout_secs <= 0 {
            return Err(ValidationError::InvalidCaptureTimeout);
        }
        if self.http_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: None,
            razorpay_key_secret: None,
            currency: default_currency(),
            capture_timeout_secs: default_capture_timeout(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_capture_timeout() -> i64 {
    600
}

fn default_http_timeout() -> u64 {
    10
}
