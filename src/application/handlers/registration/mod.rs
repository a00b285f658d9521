//! Registration flow handlers.
//!
//! The paid flow is split into two calls mirroring how hosted checkouts
//! work: `start` validates the attempt and opens a gateway order, the
//! client runs the capture UI, and `complete` verifies the capture and
//! commits the registration.

mod duplicate_guard;
mod get_registration_count;
mod payment_orchestrator;
mod register_for_event;
mod registration_writer;

pub use duplicate_guard::DuplicateGuard;
pub use get_registration_count::{
    GetRegistrationCountHandler, GetRegistrationCountQuery, RegistrationCount,
};
pub use payment_orchestrator::{CaptureCallback, PaymentHandle, PaymentOrchestrator};
pub use register_for_event::{
    RegisterForEventCommand, RegisterForEventHandler, RegistrationOutcome, StartedRegistration,
};
pub use registration_writer::RegistrationWriter;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared mocks and fixtures for registration handler tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};

    use crate::domain::event::{Event, EventCategory, Participation, TeamSizeBounds};
    use crate::domain::foundation::{DomainError, ErrorCode, EventId, Money};
    use crate::domain::registration::{CommittedRegistration, Participant, RegistrationRecord};
    use crate::ports::{
        CapturedPayment, CheckoutDescriptor, CheckoutPrefill, CreateOrderRequest, EventStore,
        GatewayError, PaymentGateway, PaymentOrder, RegistrationNotifier, RegistrationStore,
        RegistrationStoreError,
    };

    pub fn sample_event(participation: Participation) -> Event {
        Event::new(
            EventId::new(),
            "Hack Night",
            "Overnight hackathon",
            EventCategory::Competition,
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            "Main Auditorium",
            Money::from_major(100),
            25,
            participation,
        )
        .unwrap()
    }

    pub fn team_event(min: u32, max: u32) -> Event {
        sample_event(Participation::Group(TeamSizeBounds::new(min, max).unwrap()))
    }

    pub fn participant(email: &str) -> Participant {
        Participant {
            name: "Asha Rao".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            student_id: "CS21B042".to_string(),
            year: None,
            department: None,
            dietary_restrictions: None,
            emergency_contact: None,
            emergency_phone: None,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Event Store
    // ════════════════════════════════════════════════════════════════════════════

    pub struct MockEventStore {
        events: Mutex<Vec<Event>>,
    }

    impl MockEventStore {
        pub fn with_event(event: Event) -> Self {
            Self {
                events: Mutex::new(vec![event]),
            }
        }

        /// Mutates the stored copy, simulating a concurrent admin action.
        pub fn replace(&self, event: Event) {
            let mut events = self.events.lock().unwrap();
            events.retain(|e| e.id != event.id);
            events.push(event);
        }
    }

    #[async_trait]
    impl EventStore for MockEventStore {
        async fn list(&self) -> Result<Vec<Event>, DomainError> {
            Ok(self.events.lock().unwrap().clone())
        }

        async fn find(&self, id: EventId) -> Result<Option<Event>, DomainError> {
            Ok(self
                .events
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .cloned())
        }

        async fn insert(&self, event: &Event) -> Result<(), DomainError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }

        async fn update(&self, event: &Event) -> Result<(), DomainError> {
            self.replace(event.clone());
            Ok(())
        }

        async fn delete(&self, id: EventId) -> Result<(), DomainError> {
            self.events.lock().unwrap().retain(|e| e.id != id);
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Registration Store
    // ════════════════════════════════════════════════════════════════════════════

    pub struct MockRegistrationStore {
        rows: Mutex<HashMap<(EventId, String), RegistrationRecord>>,
        fail_writes: bool,
    }

    impl MockRegistrationStore {
        pub fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                fail_writes: false,
            }
        }

        pub fn failing_writes() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                fail_writes: true,
            }
        }

        pub fn rows(&self) -> Vec<RegistrationRecord> {
            self.rows.lock().unwrap().values().cloned().collect()
        }

        pub fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn insert_row(
            rows: &mut HashMap<(EventId, String), RegistrationRecord>,
            row: &RegistrationRecord,
        ) -> Result<(), RegistrationStoreError> {
            let key = (row.event_id, row.participant.email.clone());
            if rows.contains_key(&key) {
                return Err(RegistrationStoreError::Duplicate {
                    email: row.participant.email.clone(),
                });
            }
            rows.insert(key, row.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl RegistrationStore for MockRegistrationStore {
        async fn insert(&self, row: &RegistrationRecord) -> Result<(), RegistrationStoreError> {
            if self.fail_writes {
                return Err(RegistrationStoreError::Storage(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated insert failure",
                )));
            }
            let mut rows = self.rows.lock().unwrap();
            Self::insert_row(&mut rows, row)
        }

        async fn insert_team(
            &self,
            team_rows: &[RegistrationRecord],
        ) -> Result<(), RegistrationStoreError> {
            if self.fail_writes {
                return Err(RegistrationStoreError::Storage(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated insert failure",
                )));
            }
            let mut rows = self.rows.lock().unwrap();
            // All-or-nothing, like the transactional adapter.
            let snapshot = rows.clone();
            for row in team_rows {
                if let Err(err) = Self::insert_row(&mut rows, row) {
                    *rows = snapshot;
                    return Err(err);
                }
            }
            Ok(())
        }

        async fn find(
            &self,
            event_id: EventId,
            email: &str,
        ) -> Result<Option<RegistrationRecord>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(&(event_id, email.to_string()))
                .cloned())
        }

        async fn count_completed(&self, event: &Event) -> Result<u64, DomainError> {
            let rows = self.rows.lock().unwrap();
            let for_event = rows.values().filter(|r| r.event_id == event.id);
            if event.participation.is_group() {
                let teams: std::collections::HashSet<_> = for_event
                    .filter_map(|r| r.team_registration_id)
                    .collect();
                Ok(teams.len() as u64)
            } else {
                Ok(for_event.count() as u64)
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Payment Gateway
    // ════════════════════════════════════════════════════════════════════════════

    pub struct MockGateway {
        offline: bool,
        fail_create_order: bool,
        reject_signature: bool,
        pub created_orders: Mutex<Vec<CreateOrderRequest>>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self {
                offline: false,
                fail_create_order: false,
                reject_signature: false,
                created_orders: Mutex::new(Vec::new()),
            }
        }

        pub fn offline() -> Self {
            Self {
                offline: true,
                ..Self::new()
            }
        }

        pub fn failing_orders() -> Self {
            Self {
                fail_create_order: true,
                ..Self::new()
            }
        }

        pub fn rejecting_signatures() -> Self {
            Self {
                reject_signature: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn create_order(
            &self,
            request: CreateOrderRequest,
        ) -> Result<PaymentOrder, GatewayError> {
            if self.fail_create_order {
                return Err(GatewayError::network("connection timed out"));
            }
            let order = PaymentOrder {
                order_id: format!("order_test_{}", request.receipt),
                amount_minor: request.amount_minor,
                currency: request.currency.clone(),
            };
            self.created_orders.lock().unwrap().push(request);
            Ok(order)
        }

        async fn verify_capture(
            &self,
            order: &PaymentOrder,
            capture: &CapturedPayment,
        ) -> Result<(), GatewayError> {
            if capture.order_id != order.order_id {
                return Err(GatewayError::new(
                    crate::ports::GatewayErrorCode::OrderMismatch,
                    "capture references a different order",
                ));
            }
            if self.reject_signature {
                return Err(GatewayError::invalid_signature("signature mismatch"));
            }
            Ok(())
        }

        fn checkout_descriptor(
            &self,
            order: &PaymentOrder,
            prefill: CheckoutPrefill,
        ) -> CheckoutDescriptor {
            CheckoutDescriptor {
                key_id: if self.offline {
                    None
                } else {
                    Some("rzp_test_key".to_string())
                },
                order_id: order.order_id.clone(),
                amount_minor: order.amount_minor,
                currency: order.currency.clone(),
                description: "Event registration".to_string(),
                prefill,
            }
        }

        fn is_offline(&self) -> bool {
            self.offline
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Notifier
    // ════════════════════════════════════════════════════════════════════════════

    pub struct MockNotifier {
        notified: Mutex<Vec<CommittedRegistration>>,
        fail: bool,
    }

    impl MockNotifier {
        pub fn new() -> Self {
            Self {
                notified: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                notified: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn notified(&self) -> Vec<CommittedRegistration> {
            self.notified.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RegistrationNotifier for MockNotifier {
        async fn registration_committed(
            &self,
            committed: &CommittedRegistration,
        ) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::new(
                    ErrorCode::InternalError,
                    "Simulated notifier failure",
                ));
            }
            self.notified.lock().unwrap().push(committed.clone());
            Ok(())
        }
    }
}
