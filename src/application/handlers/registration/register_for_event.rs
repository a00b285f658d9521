//! RegisterForEventHandler - the paid registration flow, start to settle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::domain::foundation::{AttemptId, Timestamp};
use crate::domain::pricing::PricingQuote;
use crate::domain::registration::{
    CommittedRegistration, PaymentProof, RegistrationAttempt, RegistrationError,
    RegistrationValidator, ValidatedAttempt,
};
use crate::ports::{CheckoutDescriptor, EventStore, PaymentOrder, RegistrationNotifier};

use super::{CaptureCallback, DuplicateGuard, PaymentOrchestrator, RegistrationWriter};

/// Command to start a registration attempt.
#[derive(Debug, Clone)]
pub struct RegisterForEventCommand {
    pub attempt: RegistrationAttempt,
}

/// Result of starting an attempt.
#[derive(Debug, Clone)]
pub enum StartedRegistration {
    /// A gateway order is open; the client must run the capture UI and
    /// call back with the result.
    AwaitingCapture {
        attempt_id: AttemptId,
        quote: PricingQuote,
        checkout: CheckoutDescriptor,
    },

    /// The offline gateway captured immediately; nothing left to do.
    Completed(RegistrationOutcome),
}

/// A settled registration.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub attempt_id: AttemptId,
    pub committed: CommittedRegistration,
    pub quote: PricingQuote,

    /// True when the payment was a synthetic offline capture.
    pub offline: bool,
}

struct PendingAttempt {
    validated: ValidatedAttempt,
    order: PaymentOrder,
    expires_at: Timestamp,
}

/// Handler for the two-call paid registration flow.
///
/// Pending attempts live in memory between `start` and `complete`; an
/// attempt that outlives its capture window is forgotten and the client
/// must start over. Nothing durable exists for an attempt until its
/// payment is captured and its rows are written.
pub struct RegisterForEventHandler {
    events: Arc<dyn EventStore>,
    validator: RegistrationValidator,
    guard: DuplicateGuard,
    payments: PaymentOrchestrator,
    writer: RegistrationWriter,
    notifier: Arc<dyn RegistrationNotifier>,
    pending: Mutex<HashMap<AttemptId, PendingAttempt>>,
    capture_timeout_secs: i64,
}

impl RegisterForEventHandler {
    pub fn new(
        events: Arc<dyn EventStore>,
        validator: RegistrationValidator,
        guard: DuplicateGuard,
        payments: PaymentOrchestrator,
        writer: RegistrationWriter,
        notifier: Arc<dyn RegistrationNotifier>,
        capture_timeout_secs: i64,
    ) -> Self {
        Self {
            events,
            validator,
            guard,
            payments,
            writer,
            notifier,
            pending: Mutex::new(HashMap::new()),
            capture_timeout_secs,
        }
    }

    /// Validates the attempt, pre-checks duplicates, and opens a gateway
    /// order. No money moves and nothing is persisted here.
    pub async fn start(
        &self,
        cmd: RegisterForEventCommand,
    ) -> Result<StartedRegistration, RegistrationError> {
        let event = self
            .events
            .find(cmd.attempt.event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound {
                event_id: cmd.attempt.event_id,
            })?;

        let validated = self.validator.validate(&event, &cmd.attempt)?;
        self.guard.check(event.id, &validated.emails()).await?;

        let handle = self.payments.begin_capture(&validated).await?;

        if let Some(proof) = handle.proof {
            let outcome = self.settle(validated, proof).await?;
            return Ok(StartedRegistration::Completed(outcome));
        }

        let attempt_id = validated.attempt_id;
        let quote = validated.quote.clone();
        {
            let mut pending = self.pending.lock().map_err(poisoned)?;
            prune_expired(&mut pending);
            pending.insert(
                attempt_id,
                PendingAttempt {
                    validated,
                    order: handle.order,
                    expires_at: Timestamp::now().add_secs(self.capture_timeout_secs),
                },
            );
        }

        info!(%attempt_id, event_id = %event.id, "Registration awaiting capture");

        Ok(StartedRegistration::AwaitingCapture {
            attempt_id,
            quote,
            checkout: handle.checkout,
        })
    }

    /// Consumes the pending attempt with the capture UI's result.
    ///
    /// On failure or cancellation the attempt is simply forgotten; the
    /// user starts over. On success the capture is verified and the
    /// registration committed.
    pub async fn complete(
        &self,
        attempt_id: AttemptId,
        callback: CaptureCallback,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let pending = {
            let mut pending = self.pending.lock().map_err(poisoned)?;
            pending
                .remove(&attempt_id)
                .filter(|p| Timestamp::now().is_before(&p.expires_at))
                .ok_or(RegistrationError::UnknownAttempt { attempt_id })?
        };

        let proof = self
            .payments
            .resolve_capture(
                &pending.order,
                pending.validated.quote.final_total,
                callback,
            )
            .await?;

        self.settle(pending.validated, proof).await
    }

    /// Number of attempts currently awaiting capture.
    pub fn pending_captures(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    async fn settle(
        &self,
        validated: ValidatedAttempt,
        proof: PaymentProof,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let committed = match self.writer.commit(&validated, &proof).await {
            Ok(committed) => committed,
            Err(err) => return Err(post_capture_error(&validated, &proof, err)),
        };

        if let Err(err) = self.notifier.registration_committed(&committed).await {
            // The row is durable; a failed notification only means stale
            // caches until the next read.
            warn!(
                attempt_id = %validated.attempt_id,
                error = %err,
                "Registration notifier failed"
            );
        }

        Ok(RegistrationOutcome {
            attempt_id: validated.attempt_id,
            committed,
            quote: validated.quote,
            offline: proof.offline,
        })
    }
}

/// Maps commit failures that happen after money moved.
///
/// A duplicate here means somebody else won the race for the same email
/// after this attempt's pre-check; the duplicate rejection stands but the
/// captured payment needs a refund, so it is logged loudly. Every other
/// failure becomes a reconciliation error carrying the payment id.
fn post_capture_error(
    validated: &ValidatedAttempt,
    proof: &PaymentProof,
    err: RegistrationError,
) -> RegistrationError {
    match err {
        RegistrationError::AlreadyRegistered { event_id, email } => {
            error!(
                attempt_id = %validated.attempt_id,
                payment_id = %proof.payment_id,
                %email,
                "Duplicate registration detected after capture, refund required"
            );
            RegistrationError::AlreadyRegistered { event_id, email }
        }
        other => {
            let reason = other.to_string();
            error!(
                attempt_id = %validated.attempt_id,
                payment_id = %proof.payment_id,
                %reason,
                "Registration write failed after capture"
            );
            RegistrationError::Reconciliation {
                attempt_id: validated.attempt_id,
                event_id: validated.event_id,
                email: validated.contact().email.clone(),
                payment_id: proof.payment_id.clone(),
                reason,
            }
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RegistrationError {
    RegistrationError::Write {
        reason: "pending attempt state is poisoned".to_string(),
    }
}

fn prune_expired(pending: &mut HashMap<AttemptId, PendingAttempt>) {
    let now = Timestamp::now();
    pending.retain(|_, p| now.is_before(&p.expires_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::registration::testing::{
        participant, sample_event, team_event, MockEventStore, MockGateway, MockNotifier,
        MockRegistrationStore,
    };
    use crate::domain::event::{Event, EventStatus, Participation};
    use crate::domain::foundation::{Money, RoleTier};
    use crate::domain::registration::AttemptDetails;
    use crate::ports::CapturedPayment;

    struct Harness {
        handler: RegisterForEventHandler,
        events: Arc<MockEventStore>,
        registrations: Arc<MockRegistrationStore>,
        notifier: Arc<MockNotifier>,
    }

    fn harness(event: Event, gateway: MockGateway) -> Harness {
        let events = Arc::new(MockEventStore::with_event(event));
        let registrations = Arc::new(MockRegistrationStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let gateway = Arc::new(gateway);

        let handler = RegisterForEventHandler::new(
            events.clone(),
            RegistrationValidator::default(),
            DuplicateGuard::new(registrations.clone()),
            PaymentOrchestrator::new(gateway, "INR"),
            RegistrationWriter::new(events.clone(), registrations.clone()),
            notifier.clone(),
            600,
        );

        Harness {
            handler,
            events,
            registrations,
            notifier,
        }
    }

    fn individual_attempt(event: &Event, role: RoleTier, email: &str) -> RegisterForEventCommand {
        RegisterForEventCommand {
            attempt: RegistrationAttempt {
                event_id: event.id,
                role,
                details: AttemptDetails::Individual {
                    participant: participant(email),
                },
            },
        }
    }

    fn team_attempt(event: &Event, emails: &[&str]) -> RegisterForEventCommand {
        RegisterForEventCommand {
            attempt: RegistrationAttempt {
                event_id: event.id,
                role: RoleTier::RegularMember,
                details: AttemptDetails::Team {
                    team_name: "Nullpointers".to_string(),
                    leader: participant(emails[0]),
                    members: emails[1..].iter().map(|e| participant(e)).collect(),
                },
            },
        }
    }

    fn captured(order_id: &str) -> CaptureCallback {
        CaptureCallback::Success(CapturedPayment {
            payment_id: "pay_abc".to_string(),
            order_id: order_id.to_string(),
            signature: "sig".to_string(),
        })
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Happy Paths
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn individual_flow_settles_end_to_end() {
        let event = sample_event(Participation::Individual);
        let h = harness(event.clone(), MockGateway::new());

        let started = h
            .handler
            .start(individual_attempt(&event, RoleTier::ExecutiveMember, "asha@club.edu"))
            .await
            .unwrap();

        let (attempt_id, checkout) = match started {
            StartedRegistration::AwaitingCapture {
                attempt_id,
                quote,
                checkout,
            } => {
                // ₹100 base, executive half price.
                assert_eq!(quote.final_total, Money::from_major(50));
                (attempt_id, checkout)
            }
            _ => panic!("expected awaiting capture"),
        };
        assert_eq!(h.handler.pending_captures(), 1);

        let outcome = h
            .handler
            .complete(attempt_id, captured(&checkout.order_id))
            .await
            .unwrap();

        assert!(!outcome.offline);
        assert_eq!(outcome.attempt_id, attempt_id);
        assert_eq!(h.registrations.row_count(), 1);
        assert_eq!(h.notifier.notified().len(), 1);
        assert_eq!(h.handler.pending_captures(), 0);
    }

    #[tokio::test]
    async fn team_flow_writes_all_member_rows() {
        let event = team_event(2, 5);
        let h = harness(event.clone(), MockGateway::new());

        let started = h
            .handler
            .start(team_attempt(&event, &["lead@club.edu", "m1@club.edu", "m2@club.edu"]))
            .await
            .unwrap();
        let (attempt_id, checkout) = match started {
            StartedRegistration::AwaitingCapture {
                attempt_id,
                checkout,
                ..
            } => (attempt_id, checkout),
            _ => panic!("expected awaiting capture"),
        };

        let outcome = h
            .handler
            .complete(attempt_id, captured(&checkout.order_id))
            .await
            .unwrap();

        match outcome.committed {
            CommittedRegistration::Team(team) => {
                assert_eq!(team.size(), 3);
                assert!(team.leader().is_some());
            }
            _ => panic!("expected a team commit"),
        }
        assert_eq!(h.registrations.row_count(), 3);
    }

    #[tokio::test]
    async fn offline_gateway_completes_in_one_call() {
        let event = sample_event(Participation::Individual);
        let h = harness(event.clone(), MockGateway::offline());

        let started = h
            .handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await
            .unwrap();

        let outcome = match started {
            StartedRegistration::Completed(outcome) => outcome,
            _ => panic!("expected a completed registration"),
        };
        assert!(outcome.offline);
        assert_eq!(h.registrations.row_count(), 1);
        assert_eq!(h.handler.pending_captures(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Pre-payment Rejections
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_event_is_rejected() {
        let event = sample_event(Participation::Individual);
        let h = harness(event, MockGateway::new());

        let mut cmd = individual_attempt(
            &sample_event(Participation::Individual),
            RoleTier::Guest,
            "asha@club.edu",
        );
        cmd.attempt.event_id = crate::domain::foundation::EventId::new();

        let result = h.handler.start(cmd).await;
        assert!(matches!(result, Err(RegistrationError::EventNotFound { .. })));
    }

    #[tokio::test]
    async fn closed_event_is_rejected_before_payment() {
        let mut event = sample_event(Participation::Individual);
        event.status = EventStatus::Closed;
        let h = harness(event.clone(), MockGateway::new());

        let result = h
            .handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await;

        assert!(matches!(result, Err(RegistrationError::EventClosed { .. })));
        assert_eq!(h.handler.pending_captures(), 0);
    }

    #[tokio::test]
    async fn duplicate_is_rejected_before_payment() {
        let event = sample_event(Participation::Individual);
        let h = harness(event.clone(), MockGateway::offline());

        h.handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await
            .unwrap();

        let result = h
            .handler
            .start(individual_attempt(&event, RoleTier::Guest, "Asha@Club.EDU"))
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::AlreadyRegistered { .. })
        ));
        assert_eq!(h.registrations.row_count(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Capture Outcomes
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn cancelled_capture_forgets_the_attempt() {
        let event = sample_event(Participation::Individual);
        let h = harness(event.clone(), MockGateway::new());

        let started = h
            .handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await
            .unwrap();
        let attempt_id = match started {
            StartedRegistration::AwaitingCapture { attempt_id, .. } => attempt_id,
            _ => panic!("expected awaiting capture"),
        };

        let result = h.handler.complete(attempt_id, CaptureCallback::Cancelled).await;

        assert!(matches!(result, Err(RegistrationError::CaptureCancelled)));
        assert_eq!(h.registrations.row_count(), 0);
        assert_eq!(h.handler.pending_captures(), 0);

        // The attempt is gone; a second completion is unknown.
        let again = h.handler.complete(attempt_id, CaptureCallback::Cancelled).await;
        assert!(matches!(again, Err(RegistrationError::UnknownAttempt { .. })));
    }

    #[tokio::test]
    async fn unknown_attempt_is_rejected() {
        let event = sample_event(Participation::Individual);
        let h = harness(event, MockGateway::new());

        let result = h
            .handler
            .complete(AttemptId::new(), CaptureCallback::Cancelled)
            .await;

        assert!(matches!(result, Err(RegistrationError::UnknownAttempt { .. })));
    }

    #[tokio::test]
    async fn forged_signature_does_not_commit() {
        let event = sample_event(Participation::Individual);
        let h = harness(event.clone(), MockGateway::rejecting_signatures());

        let started = h
            .handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await
            .unwrap();
        let (attempt_id, checkout) = match started {
            StartedRegistration::AwaitingCapture {
                attempt_id,
                checkout,
                ..
            } => (attempt_id, checkout),
            _ => panic!("expected awaiting capture"),
        };

        let result = h
            .handler
            .complete(attempt_id, captured(&checkout.order_id))
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::CaptureFailed {
                retryable: false,
                ..
            })
        ));
        assert_eq!(h.registrations.row_count(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Post-capture Failures
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn event_closed_after_capture_needs_reconciliation() {
        let event = sample_event(Participation::Individual);
        let h = harness(event.clone(), MockGateway::new());

        let started = h
            .handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await
            .unwrap();
        let (attempt_id, checkout) = match started {
            StartedRegistration::AwaitingCapture {
                attempt_id,
                checkout,
                ..
            } => (attempt_id, checkout),
            _ => panic!("expected awaiting capture"),
        };

        // Admin closes the event while the capture UI is open.
        let mut closed = event.clone();
        closed.status = EventStatus::Closed;
        h.events.replace(closed);

        let result = h
            .handler
            .complete(attempt_id, captured(&checkout.order_id))
            .await;

        match result {
            Err(RegistrationError::Reconciliation {
                payment_id, email, ..
            }) => {
                assert_eq!(payment_id, "pay_abc");
                assert_eq!(email, "asha@club.edu");
            }
            other => panic!("expected a reconciliation error, got {:?}", other),
        }
        assert_eq!(h.registrations.row_count(), 0);
        assert!(h.notifier.notified().is_empty());
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_the_registration() {
        let event = sample_event(Participation::Individual);
        let events = Arc::new(MockEventStore::with_event(event.clone()));
        let registrations = Arc::new(MockRegistrationStore::new());
        let handler = RegisterForEventHandler::new(
            events.clone(),
            RegistrationValidator::default(),
            DuplicateGuard::new(registrations.clone()),
            PaymentOrchestrator::new(Arc::new(MockGateway::offline()), "INR"),
            RegistrationWriter::new(events, registrations.clone()),
            Arc::new(MockNotifier::failing()),
            600,
        );

        let result = handler
            .start(individual_attempt(&event, RoleTier::Guest, "asha@club.edu"))
            .await;

        assert!(matches!(result, Ok(StartedRegistration::Completed(_))));
        assert_eq!(registrations.row_count(), 1);
    }
}
