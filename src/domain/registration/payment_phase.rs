//! Payment phase state machine and capture proof.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, StateMachine};

/// Phase of one registration attempt's payment.
///
/// `Settled` means money was captured and the registration row is durable.
/// `Captured` without `Settled` is the reconciliation window: money moved
/// but no record exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPhase {
    /// Nothing has happened yet.
    Idle,

    /// A gateway order exists; the capture UI is open.
    AwaitingCapture,

    /// The gateway confirmed capture. Money has moved.
    Captured,

    /// Capture confirmed and registration persisted. Terminal.
    Settled,

    /// Capture failed or timed out before money moved. Terminal.
    Failed,

    /// The user abandoned the capture UI. Terminal.
    Cancelled,
}

impl StateMachine for PaymentPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentPhase::*;
        matches!(
            (self, target),
            (Idle, AwaitingCapture)
                | (AwaitingCapture, Captured)
                | (AwaitingCapture, Failed)
                | (AwaitingCapture, Cancelled)
                | (Captured, Settled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentPhase::*;
        match self {
            Idle => vec![AwaitingCapture],
            AwaitingCapture => vec![Captured, Failed, Cancelled],
            Captured => vec![Settled],
            Settled | Failed | Cancelled => vec![],
        }
    }
}

/// Verified proof of a captured payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub payment_id: String,
    pub order_id: String,

    /// Gateway signature over (order id, payment id). `None` only for
    /// offline captures.
    pub signature: Option<String>,

    /// Captured amount in major units.
    pub amount: Money,

    /// True when produced by the offline fallback gateway. Synthetic
    /// captures never mix with real-money captures in one deployment.
    pub offline: bool,
}
