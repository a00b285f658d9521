//! Offline fallback gateway.
//!
//! Used when no Razorpay credentials are configured, so demo and local
//! deployments still run the whole registration flow. Orders and
//! payments get recognizable `demo_` ids and the resulting proofs carry
//! the offline flag; nothing here ever represents real money.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::ports::{
    CapturedPayment, CheckoutDescriptor, CheckoutPrefill, CreateOrderRequest, GatewayError,
    PaymentGateway, PaymentOrder,
};

/// Gateway that fabricates successful captures.
#[derive(Debug, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<PaymentOrder, GatewayError> {
        let order = PaymentOrder {
            order_id: format!("demo_order_{}", Uuid::new_v4().simple()),
            amount_minor: request.amount_minor,
            currency: request.currency,
        };
        info!(order_id = %order.order_id, receipt = %request.receipt, "Offline order created");
        Ok(order)
    }

    async fn verify_capture(
        &self,
        _order: &PaymentOrder,
        _capture: &CapturedPayment,
    ) -> Result<(), GatewayError> {
        // Offline captures are synthesized server-side and never reach
        // this path; accept anything that does.
        Ok(())
    }

    fn checkout_descriptor(
        &self,
        order: &PaymentOrder,
        prefill: CheckoutPrefill,
    ) -> CheckoutDescriptor {
        CheckoutDescriptor {
            key_id: None,
            order_id: order.order_id.clone(),
            amount_minor: order.amount_minor,
            currency: order.currency.clone(),
            description: "Event registration (demo mode)".to_string(),
            prefill,
        }
    }

    fn is_offline(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn orders_get_demo_ids() {
        let gateway = OfflineGateway::new();
        let order = gateway
            .create_order(CreateOrderRequest {
                amount_minor: 5000,
                currency: "INR".to_string(),
                receipt: "individual_test_1".to_string(),
            })
            .await
            .unwrap();

        assert!(order.order_id.starts_with("demo_order_"));
        assert_eq!(order.amount_minor, 5000);
        assert!(gateway.is_offline());
    }

    #[tokio::test]
    async fn descriptor_has_no_key_id() {
        let gateway = OfflineGateway::new();
        let order = gateway
            .create_order(CreateOrderRequest {
                amount_minor: 100,
                currency: "INR".to_string(),
                receipt: "r".to_string(),
            })
            .await
            .unwrap();

        let descriptor = gateway.checkout_descriptor(
            &order,
            CheckoutPrefill {
                name: "Asha".to_string(),
                email: "asha@club.edu".to_string(),
                contact: "9876543210".to_string(),
            },
        );

        assert!(descriptor.key_id.is_none());
    }
}
