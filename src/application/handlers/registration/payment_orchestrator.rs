//! Payment orchestrator.
//!
//! Drives one attempt's payment through its phases: order creation,
//! client-side capture, server-side verification. Registration
//! persistence is the writer's job; the orchestrator only ever produces
//! a verified `PaymentProof`.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::foundation::{Money, Timestamp};
use crate::domain::registration::{PaymentPhase, PaymentProof, RegistrationError, ValidatedAttempt};
use crate::ports::{
    CapturedPayment, CheckoutDescriptor, CheckoutPrefill, CreateOrderRequest, GatewayError,
    GatewayErrorCode, PaymentGateway, PaymentOrder,
};

/// What the client reported back from the capture UI.
#[derive(Debug, Clone)]
pub enum CaptureCallback {
    /// The UI reported success; the payload still has to verify.
    Success(CapturedPayment),

    /// The UI reported a gateway-side failure.
    Failure { reason: String },

    /// The user dismissed the UI without paying.
    Cancelled,
}

/// A gateway order awaiting capture, plus everything the client needs.
#[derive(Debug, Clone)]
pub struct PaymentHandle {
    pub order: PaymentOrder,
    pub phase: PaymentPhase,
    pub checkout: CheckoutDescriptor,

    /// Present only for offline captures, which skip the capture UI
    /// entirely and arrive here already captured.
    pub proof: Option<PaymentProof>,
}

/// Orchestrates gateway orders and capture verification.
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            currency: currency.into(),
        }
    }

    /// Opens a gateway order for the validated attempt's quoted total.
    ///
    /// Money has not moved yet when this returns, except for the offline
    /// gateway, which synthesizes an immediate capture so demo
    /// deployments work without gateway credentials.
    pub async fn begin_capture(
        &self,
        validated: &ValidatedAttempt,
    ) -> Result<PaymentHandle, RegistrationError> {
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount_minor: validated.quote.final_total.to_minor_units(),
                currency: self.currency.clone(),
                receipt: receipt_for(validated),
            })
            .await
            .map_err(capture_error)?;

        let contact = validated.contact();
        let checkout = self.gateway.checkout_descriptor(
            &order,
            CheckoutPrefill {
                name: contact.name.clone(),
                email: contact.email.clone(),
                contact: contact.phone.clone(),
            },
        );

        debug!(
            attempt_id = %validated.attempt_id,
            order_id = %order.order_id,
            amount_minor = order.amount_minor,
            "Gateway order created"
        );

        if self.gateway.is_offline() {
            // No capture UI in offline mode. The synthetic proof carries
            // the offline flag so downstream records are identifiable.
            let proof = PaymentProof {
                payment_id: format!("demo_payment_{}", Uuid::new_v4().simple()),
                order_id: order.order_id.clone(),
                signature: None,
                amount: validated.quote.final_total,
                offline: true,
            };
            info!(
                attempt_id = %validated.attempt_id,
                payment_id = %proof.payment_id,
                "Offline gateway, capture short-circuited"
            );
            return Ok(PaymentHandle {
                order,
                phase: PaymentPhase::Captured,
                checkout,
                proof: Some(proof),
            });
        }

        Ok(PaymentHandle {
            order,
            phase: PaymentPhase::AwaitingCapture,
            checkout,
            proof: None,
        })
    }

    /// Turns the client's capture callback into a verified proof.
    ///
    /// `amount` is the quoted total the order was opened for; it becomes
    /// the captured amount on the proof.
    pub async fn resolve_capture(
        &self,
        order: &PaymentOrder,
        amount: Money,
        callback: CaptureCallback,
    ) -> Result<PaymentProof, RegistrationError> {
        match callback {
            CaptureCallback::Success(capture) => {
                self.gateway
                    .verify_capture(order, &capture)
                    .await
                    .map_err(capture_error)?;

                info!(
                    order_id = %capture.order_id,
                    payment_id = %capture.payment_id,
                    "Payment capture verified"
                );

                Ok(PaymentProof {
                    payment_id: capture.payment_id,
                    order_id: capture.order_id,
                    signature: Some(capture.signature),
                    amount,
                    offline: false,
                })
            }
            CaptureCallback::Failure { reason } => Err(RegistrationError::CaptureFailed {
                reason,
                // The client reported a failed capture attempt, not a
                // rejected one. Starting over is safe.
                retryable: true,
            }),
            CaptureCallback::Cancelled => Err(RegistrationError::CaptureCancelled),
        }
    }
}

fn capture_error(err: GatewayError) -> RegistrationError {
    // A bad signature or mismatched order is a hard stop, never a retry.
    let retryable = match err.code {
        GatewayErrorCode::InvalidSignature | GatewayErrorCode::OrderMismatch => false,
        _ => err.retryable,
    };
    RegistrationError::CaptureFailed {
        reason: err.message,
        retryable,
    }
}

fn receipt_for(validated: &ValidatedAttempt) -> String {
    let kind = if validated.is_team() {
        "team"
    } else {
        "individual"
    };
    let ts = Timestamp::now().as_datetime().timestamp_millis();
    format!("{}_{}_{}", kind, validated.event_id, ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::registration::testing::{participant, MockGateway};
    use crate::domain::foundation::{AttemptId, EventId, RoleTier};
    use crate::domain::pricing::PricingEngine;

    fn validated_individual() -> ValidatedAttempt {
        let quote = PricingEngine::default()
            .quote(Money::from_major(100), RoleTier::ExecutiveMember, 1)
            .unwrap();
        ValidatedAttempt {
            attempt_id: AttemptId::new(),
            event_id: EventId::new(),
            role: RoleTier::ExecutiveMember,
            participants: vec![participant("asha@club.edu")],
            team_name: None,
            quote,
        }
    }

    #[tokio::test]
    async fn order_is_created_in_minor_units() {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = PaymentOrchestrator::new(gateway.clone(), "INR");

        let handle = orchestrator
            .begin_capture(&validated_individual())
            .await
            .unwrap();

        assert_eq!(handle.phase, PaymentPhase::AwaitingCapture);
        assert!(handle.proof.is_none());
        // ₹50 quoted, 5000 paise on the wire.
        assert_eq!(handle.order.amount_minor, 5000);
        let orders = gateway.created_orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].currency, "INR");
        assert!(orders[0].receipt.starts_with("individual_"));
    }

    #[tokio::test]
    async fn offline_gateway_short_circuits_to_captured() {
        let orchestrator = PaymentOrchestrator::new(Arc::new(MockGateway::offline()), "INR");

        let handle = orchestrator
            .begin_capture(&validated_individual())
            .await
            .unwrap();

        assert_eq!(handle.phase, PaymentPhase::Captured);
        let proof = handle.proof.unwrap();
        assert!(proof.offline);
        assert!(proof.signature.is_none());
        assert!(proof.payment_id.starts_with("demo_payment_"));
        assert_eq!(proof.amount, Money::from_major(50));
    }

    #[tokio::test]
    async fn order_failure_is_retryable_when_transient() {
        let orchestrator =
            PaymentOrchestrator::new(Arc::new(MockGateway::failing_orders()), "INR");

        let result = orchestrator.begin_capture(&validated_individual()).await;

        assert!(matches!(
            result,
            Err(RegistrationError::CaptureFailed {
                retryable: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn verified_capture_becomes_proof() {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = PaymentOrchestrator::new(gateway, "INR");
        let validated = validated_individual();
        let handle = orchestrator.begin_capture(&validated).await.unwrap();

        let proof = orchestrator
            .resolve_capture(
                &handle.order,
                validated.quote.final_total,
                CaptureCallback::Success(CapturedPayment {
                    payment_id: "pay_abc".to_string(),
                    order_id: handle.order.order_id.clone(),
                    signature: "sig".to_string(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(proof.payment_id, "pay_abc");
        assert!(!proof.offline);
        assert_eq!(proof.amount, Money::from_major(50));
    }

    #[tokio::test]
    async fn bad_signature_is_a_hard_failure() {
        let orchestrator =
            PaymentOrchestrator::new(Arc::new(MockGateway::rejecting_signatures()), "INR");
        let validated = validated_individual();
        let handle = orchestrator.begin_capture(&validated).await.unwrap();

        let result = orchestrator
            .resolve_capture(
                &handle.order,
                validated.quote.final_total,
                CaptureCallback::Success(CapturedPayment {
                    payment_id: "pay_abc".to_string(),
                    order_id: handle.order.order_id.clone(),
                    signature: "forged".to_string(),
                }),
            )
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::CaptureFailed {
                retryable: false,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn cancelled_capture_maps_to_cancelled_error() {
        let orchestrator = PaymentOrchestrator::new(Arc::new(MockGateway::new()), "INR");
        let validated = validated_individual();
        let handle = orchestrator.begin_capture(&validated).await.unwrap();

        let result = orchestrator
            .resolve_capture(
                &handle.order,
                validated.quote.final_total,
                CaptureCallback::Cancelled,
            )
            .await;

        assert!(matches!(result, Err(RegistrationError::CaptureCancelled)));
    }
}
