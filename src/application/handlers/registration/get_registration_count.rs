//! GetRegistrationCountHandler - capacity display query.

use std::sync::Arc;

use crate::domain::foundation::EventId;
use crate::domain::registration::RegistrationError;
use crate::ports::{EventStore, RegistrationStore};

/// Query for an event's completed-registration count.
#[derive(Debug, Clone)]
pub struct GetRegistrationCountQuery {
    pub event_id: EventId,
}

/// The capacity display: registered so far out of `max_slots`.
///
/// Advisory only. The count is read without any lock, so a concurrent
/// registration can make it stale by the time it renders; nothing gates
/// a write on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCount {
    pub event_id: EventId,

    /// Completed individuals, or distinct teams for group events.
    pub registered: u64,

    pub max_slots: u32,

    /// "participants" or "teams", matching what `registered` counts.
    pub slot_label: &'static str,
}

impl RegistrationCount {
    /// True when the display should read "full". Registrations are still
    /// accepted regardless.
    pub fn is_full(&self) -> bool {
        self.registered >= self.max_slots as u64
    }
}

/// Handler for the capacity display query.
pub struct GetRegistrationCountHandler {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
}

impl GetRegistrationCountHandler {
    pub fn new(events: Arc<dyn EventStore>, registrations: Arc<dyn RegistrationStore>) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn handle(
        &self,
        query: GetRegistrationCountQuery,
    ) -> Result<RegistrationCount, RegistrationError> {
        let event = self
            .events
            .find(query.event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound {
                event_id: query.event_id,
            })?;

        let registered = self.registrations.count_completed(&event).await?;

        Ok(RegistrationCount {
            event_id: event.id,
            registered,
            max_slots: event.max_slots,
            slot_label: event.slot_label(),
        })
    }
}
