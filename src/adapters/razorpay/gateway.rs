//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Razorpay Orders API.
//!
//! # Security
//!
//! - Capture signatures are HMAC-SHA256 over `order_id|payment_id`,
//!   verified server-side with constant-time comparison
//! - The key secret is handled via `secrecy::SecretString` and never
//!   leaves the server; the client only ever sees the key id

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::ports::{
    CapturedPayment, CheckoutDescriptor, CheckoutPrefill, CreateOrderRequest, GatewayError,
    GatewayErrorCode, PaymentGateway, PaymentOrder,
};

type HmacSha256 = Hmac<Sha256>;

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Publishable key id (rzp_live_... or rzp_test_...). Safe to hand
    /// to the client.
    key_id: String,

    /// API key secret. Server-side only.
    key_secret: SecretString,

    /// Base URL for the Razorpay API.
    api_base_url: String,

    /// Request timeout for Orders API calls. A stalled call surfaces as
    /// a retryable network error instead of hanging the attempt.
    http_timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            api_base_url: "https://api.razorpay.com".to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the Orders API request timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

/// Razorpay gateway adapter.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    /// Fails only when the underlying TLS backend cannot be initialized.
    pub fn new(config: RazorpayConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Computes the expected capture signature for an order/payment pair.
    fn expected_signature(&self, order_id: &str, payment_id: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(self.config.key_secret.expose_secret().as_bytes())
                .expect("HMAC can take key of any size");
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Request body for the Razorpay order creation endpoint.
#[derive(Debug, Serialize)]
struct RazorpayOrderRequest<'a> {
    /// Amount in paise.
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Order object returned by the Razorpay API.
#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: i64,
    currency: String,
}

/// Error envelope returned by the Razorpay API.
#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayApiError,
}

#[derive(Debug, Deserialize)]
struct RazorpayApiError {
    code: Option<String>,
    description: Option<String>,
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<PaymentOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&RazorpayOrderRequest {
                amount: request.amount_minor,
                currency: &request.currency,
                receipt: &request.receipt,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::network("Order request timed out")
                } else {
                    GatewayError::network(format!("Order request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::new(
                GatewayErrorCode::AuthenticationError,
                "Razorpay rejected the API credentials",
            ));
        }
        if !status.is_success() {
            let description = response
                .json::<RazorpayErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error.description.or(e.error.code))
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(%status, %description, "Razorpay order creation failed");
            return Err(GatewayError::provider(description));
        }

        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("Invalid order response: {}", e)))?;

        Ok(PaymentOrder {
            order_id: order.id,
            amount_minor: order.amount,
            currency: order.currency,
        })
    }

    async fn verify_capture(
        &self,
        order: &PaymentOrder,
        capture: &CapturedPayment,
    ) -> Result<(), GatewayError> {
        if capture.order_id != order.order_id {
            return Err(GatewayError::new(
                GatewayErrorCode::OrderMismatch,
                "Capture references a different order",
            ));
        }

        let expected = self.expected_signature(&capture.order_id, &capture.payment_id);
        let provided = decode_hex(&capture.signature).ok_or_else(|| {
            GatewayError::invalid_signature("Capture signature is not valid hex")
        })?;

        if expected.ct_eq(provided.as_slice()).unwrap_u8() != 1 {
            warn!(
                order_id = %capture.order_id,
                payment_id = %capture.payment_id,
                "Capture signature did not verify"
            );
            return Err(GatewayError::invalid_signature(
                "Capture signature did not verify",
            ));
        }

        Ok(())
    }

    fn checkout_descriptor(
        &self,
        order: &PaymentOrder,
        prefill: CheckoutPrefill,
    ) -> CheckoutDescriptor {
        CheckoutDescriptor {
            key_id: Some(self.config.key_id.clone()),
            order_id: order.order_id.clone(),
            amount_minor: order.amount_minor,
            currency: order.currency.clone(),
            description: "Event registration".to_string(),
            prefill,
        }
    }

    fn is_offline(&self) -> bool {
        false
    }
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn gateway() -> RazorpayGateway {
        RazorpayGateway::new(RazorpayConfig::new("rzp_test_key", "test_secret")).unwrap()
    }

    fn order() -> PaymentOrder {
        PaymentOrder {
            order_id: "order_MnO123".to_string(),
            amount_minor: 5000,
            currency: "INR".to_string(),
        }
    }

    #[tokio::test]
    async fn valid_signature_verifies() {
        let gateway = gateway();
        let order = order();
        let signature = hex_encode(&gateway.expected_signature(&order.order_id, "pay_XyZ789"));

        let result = gateway
            .verify_capture(
                &order,
                &CapturedPayment {
                    payment_id: "pay_XyZ789".to_string(),
                    order_id: order.order_id.clone(),
                    signature,
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn forged_signature_is_rejected() {
        let gateway = gateway();
        let order = order();
        // Signed with the wrong secret.
        let other =
            RazorpayGateway::new(RazorpayConfig::new("rzp_test_key", "wrong_secret")).unwrap();
        let signature = hex_encode(&other.expected_signature(&order.order_id, "pay_XyZ789"));

        let result = gateway
            .verify_capture(
                &order,
                &CapturedPayment {
                    payment_id: "pay_XyZ789".to_string(),
                    order_id: order.order_id.clone(),
                    signature,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(GatewayError {
                code: GatewayErrorCode::InvalidSignature,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn signature_for_another_payment_is_rejected() {
        let gateway = gateway();
        let order = order();
        let signature =
            hex_encode(&gateway.expected_signature(&order.order_id, "pay_SOMEONE_ELSE"));

        let result = gateway
            .verify_capture(
                &order,
                &CapturedPayment {
                    payment_id: "pay_XyZ789".to_string(),
                    order_id: order.order_id.clone(),
                    signature,
                },
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn mismatched_order_id_is_rejected() {
        let gateway = gateway();
        let order = order();
        let signature = hex_encode(&gateway.expected_signature("order_OTHER", "pay_XyZ789"));

        let result = gateway
            .verify_capture(
                &order,
                &CapturedPayment {
                    payment_id: "pay_XyZ789".to_string(),
                    order_id: "order_OTHER".to_string(),
                    signature,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(GatewayError {
                code: GatewayErrorCode::OrderMismatch,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn non_hex_signature_is_rejected() {
        let gateway = gateway();
        let order = order();

        let result = gateway
            .verify_capture(
                &order,
                &CapturedPayment {
                    payment_id: "pay_XyZ789".to_string(),
                    order_id: order.order_id.clone(),
                    signature: "not-hex!".to_string(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(GatewayError {
                code: GatewayErrorCode::InvalidSignature,
                ..
            })
        ));
    }

    #[test]
    fn descriptor_exposes_the_key_id_only() {
        let gateway = gateway();
        let descriptor = gateway.checkout_descriptor(
            &order(),
            CheckoutPrefill {
                name: "Asha Rao".to_string(),
                email: "asha@club.edu".to_string(),
                contact: "9876543210".to_string(),
            },
        );

        assert_eq!(descriptor.key_id.as_deref(), Some("rzp_test_key"));
        assert_eq!(descriptor.amount_minor, 5000);
        assert!(!gateway.is_offline());
    }

    #[tokio::test]
    async fn stalled_orders_api_times_out_as_retryable_network_error() {
        // A listener that accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let gateway = RazorpayGateway::new(
            RazorpayConfig::new("rzp_test_key", "test_secret")
                .with_base_url(format!("http://{}", addr))
                .with_http_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let result = gateway
            .create_order(CreateOrderRequest {
                amount_minor: 5000,
                currency: "INR".to_string(),
                receipt: "individual_test_1".to_string(),
            })
            .await;

        match result {
            Err(err) => {
                assert!(matches!(err.code, GatewayErrorCode::NetworkError));
                assert!(err.retryable);
            }
            Ok(_) => panic!("expected the request to time out"),
        }
    }

    #[test]
    fn hex_decoding_handles_odd_input() {
        assert!(decode_hex("abc").is_none());
        assert!(decode_hex("zz").is_none());
        assert_eq!(decode_hex("00ff"), Some(vec![0, 255]));
    }
}
