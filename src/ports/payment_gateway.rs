//! Payment gateway port.
//!
//! Amounts cross this boundary in minor units (paise); everywhere else in
//! the core they are major units. That unit switch happens here and only
//! here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the external payment collaborator.
///
/// The flow is split the way hosted checkouts actually work: the server
/// creates an order, the client runs the capture UI, and the resulting
/// proof comes back to the server for signature verification.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the quoted amount.
    async fn create_order(&self, request: CreateOrderRequest)
        -> Result<PaymentOrder, GatewayError>;

    /// Verify a client-side capture against the order it claims to settle.
    ///
    /// Returns an error if the signature does not check out or the ids do
    /// not match the order.
    async fn verify_capture(
        &self,
        order: &PaymentOrder,
        capture: &CapturedPayment,
    ) -> Result<(), GatewayError>;

    /// Options for opening the client-side capture UI.
    fn checkout_descriptor(
        &self,
        order: &PaymentOrder,
        prefill: CheckoutPrefill,
    ) -> CheckoutDescriptor;

    /// True for the non-production fallback gateway that short-circuits
    /// capture into a synthetic success.
    fn is_offline(&self) -> bool;
}

/// Request to create a gateway order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in minor units (paise).
    pub amount_minor: i64,

    /// ISO currency code, e.g. "INR".
    pub currency: String,

    /// Receipt reference for support-desk lookups,
    /// e.g. `individual_<event>_<ts>`.
    pub receipt: String,
}

/// A created gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// Contact details pre-filled into the capture UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the client needs to open the capture UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutDescriptor {
    /// Publishable gateway key id; `None` for the offline gateway.
    pub key_id: Option<String>,
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub description: String,
    pub prefill: CheckoutPrefill,
}

/// Successful capture payload from the client-side UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedPayment {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

/// Errors from gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct GatewayError {
    pub code: GatewayErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }

    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidSignature, message)
    }
}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Capture signature did not verify.
    InvalidSignature,

    /// Capture referenced a different order.
    OrderMismatch,

    /// Gateway-side error.
    ProviderError,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayErrorCode::NetworkError)
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::InvalidSignature => "invalid_signature",
            GatewayErrorCode::OrderMismatch => "order_mismatch",
            GatewayErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn network_errors_are_retryable() {
        assert!(GatewayError::network("timed out").retryable);
        assert!(!GatewayError::invalid_signature("bad mac").retryable);
        assert!(!GatewayError::provider("500").retryable);
    }

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::invalid_signature("signature mismatch");
        assert!(err.to_string().contains("invalid_signature"));
        assert!(err.to_string().contains("signature mismatch"));
    }
}
